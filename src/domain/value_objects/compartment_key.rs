//! Compartment key value object.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric protection-key index of a compartment.
///
/// Key `0` denotes the implicit untrusted/shared compartment. It exists at
/// runtime but is never assigned to a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompartmentKey(u32);

impl CompartmentKey {
    /// The reserved untrusted/shared key.
    pub const UNTRUSTED: CompartmentKey = CompartmentKey(0);

    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub fn is_reserved(self) -> bool {
        self == Self::UNTRUSTED
    }
}

impl fmt::Display for CompartmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for CompartmentKey {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
