//! Unified diffs for dry runs

use std::path::Path;

use similar::TextDiff;

/// Unified diff of `old` → `new`, headed `a/<path>` / `b/<path>`.
pub fn unified_diff(path: &Path, old: &str, new: &str) -> String {
    TextDiff::from_lines(old, new)
        .unified_diff()
        .header(
            &format!("a/{}", path.display()),
            &format!("b/{}", path.display()),
        )
        .to_string()
}
