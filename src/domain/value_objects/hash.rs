//! Content hash value object
//!
//! SHA-256 digests used to stamp generated text so a later run can tell its
//! own output apart from hand-written or stale text.

use std::fmt;

/// SHA-256 digest of a piece of text, rendered as `sha256:<hex>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash(String);

impl ContentHash {
    pub const PREFIX: &'static str = "sha256:";

    pub fn from_content(content: &str) -> Self {
        use sha2::{Digest, Sha256};
        let digest = Sha256::digest(content.as_bytes());
        Self(format!("{}{:x}", Self::PREFIX, digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hex digits without the prefix
    pub fn hex(&self) -> &str {
        self.0.strip_prefix(Self::PREFIX).unwrap_or(&self.0)
    }

    /// Prefix plus the first `len` hex digits, e.g. `sha256:1a2b3c4d`.
    pub fn short(&self, len: usize) -> String {
        let hex = self.hex();
        format!("{}{}", Self::PREFIX, &hex[..len.min(hex.len())])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
