//! Compartment preamble generation and detection
//!
//! The preamble is stamped with a sentinel comment carrying a digest of its
//! body:
//!
//! ```text
//! /* compart:preamble v1 sha256:0123456789abcdef */
//! #ifdef IA2_ENABLE
//! #include <ia2.h>
//! INIT_RUNTIME(2); // This is the number of pkeys needed.
//! #define IA2_COMPARTMENT 1
//! #include <ia2_compartment_init.inc>
//! #endif /* compart:preamble */
//! ```
//!
//! Any block starting with the sentinel is recognised as ours and replaced
//! when stale. The older unguarded form (no sentinel, no guard) is recognised
//! by its exact line shapes.

use crate::config::PreambleConfig;
use crate::domain::value_objects::{CompartmentKey, ContentHash};

/// Sentinel line prefix
pub const SENTINEL_PREFIX: &str = "/* compart:preamble ";
/// Closing line of a marked preamble
pub const END_MARKER: &str = "#endif /* compart:preamble */";
/// Sentinel format version
pub const FORMAT_VERSION: u32 = 1;

/// Everything that varies between preambles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreambleSpec {
    pub key: CompartmentKey,
    /// Number of compartments created this run
    pub total_compartments: usize,
    /// The entry file defines the process entry point
    pub is_binary: bool,
}

/// Does `text` define the process entry point?
pub fn defines_entry_point(text: &str, config: &PreambleConfig) -> bool {
    text.contains(config.entry_marker.as_str())
}

/// Lines of the preamble body (between sentinel and end marker, exclusive).
fn body_lines(spec: &PreambleSpec, config: &PreambleConfig) -> Vec<String> {
    let mut lines = vec![format!("#include <{}>", config.runtime_header)];
    if spec.is_binary {
        lines.push(format!(
            "INIT_RUNTIME({}); // This is the number of pkeys needed.",
            spec.total_compartments
        ));
    }
    lines.push(format!("#define IA2_COMPARTMENT {}", spec.key));
    lines.push(format!("#include <{}>", config.init_include));
    lines
}

/// Render the full preamble, without a trailing newline.
pub fn render(spec: &PreambleSpec, config: &PreambleConfig) -> String {
    let mut guarded = vec![format!("#ifdef {}", config.guard)];
    guarded.extend(body_lines(spec, config));
    guarded.push(END_MARKER.to_string());
    let guarded = guarded.join("\n");

    let digest = ContentHash::from_content(&guarded).short(16);
    format!(
        "{}v{} {} */\n{}",
        SENTINEL_PREFIX, FORMAT_VERSION, digest, guarded
    )
}

/// What injection would do to a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Injection {
    /// File already starts with this exact preamble
    Unchanged,
    /// No preamble found; new content prepends one
    Inserted(String),
    /// A stale preamble was stripped and replaced
    Replaced(String),
}

impl Injection {
    pub fn new_content(&self) -> Option<&str> {
        match self {
            Injection::Unchanged => None,
            Injection::Inserted(content) | Injection::Replaced(content) => Some(content),
        }
    }
}

/// Decide how to bring `text` in line with `preamble`.
pub fn inject(text: &str, preamble: &str, config: &PreambleConfig) -> Injection {
    if text.starts_with(preamble) {
        return Injection::Unchanged;
    }
    match strip_existing(text, config) {
        Some(rest) => Injection::Replaced(format!("{}\n\n{}", preamble, rest)),
        None => Injection::Inserted(format!("{}\n\n{}", preamble, text)),
    }
}

/// Remove a previously injected preamble (marked or legacy) from the top of
/// `text`, returning the remainder.
pub fn strip_existing<'a>(text: &'a str, config: &PreambleConfig) -> Option<&'a str> {
    strip_marked(text).or_else(|| strip_legacy(text, config))
}

fn strip_marked(text: &str) -> Option<&str> {
    if !text.starts_with(SENTINEL_PREFIX) {
        return None;
    }
    let end = text.find(END_MARKER)?;
    let rest = &text[end + END_MARKER.len()..];
    Some(strip_separator(rest))
}

/// The unguarded form: `#include <ia2.h>`, an optional `INIT_RUNTIME(..)`,
/// `#define IA2_COMPARTMENT N`, `#include <ia2_compartment_init.inc>`.
fn strip_legacy<'a>(text: &'a str, config: &PreambleConfig) -> Option<&'a str> {
    let header = format!("#include <{}>", config.runtime_header);
    let init = format!("#include <{}>", config.init_include);

    let mut offset = 0;
    let mut lines = text.split_inclusive('\n');

    let first = lines.next()?;
    if first.trim_end() != header {
        return None;
    }
    offset += first.len();

    let mut saw_define = false;
    for line in lines {
        let trimmed = line.trim_end();
        offset += line.len();
        if trimmed == init {
            return saw_define.then(|| strip_separator(&text[offset..]));
        }
        if trimmed.starts_with("#define IA2_COMPARTMENT ") {
            saw_define = true;
        } else if !trimmed.starts_with("INIT_RUNTIME(") {
            return None;
        }
    }
    None
}

/// Drop the line break ending the preamble plus one blank separator line.
fn strip_separator(rest: &str) -> &str {
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    rest.strip_prefix('\n').unwrap_or(rest)
}
