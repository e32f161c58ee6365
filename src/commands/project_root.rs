use std::path::{Path, PathBuf};

use compart::Config;

/// Discover the primary tree root from an invocation directory.
///
/// Heuristics (first match wins, walking upward from `start`):
/// - `compart.toml` (an explicitly configured project)
/// - `.git/` or `.git` file (git repo root / worktree)
///
/// Falls back to `start` when no markers are found.
pub(crate) fn discover_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        if dir.join(Config::FILE_NAME).is_file() {
            return dir.to_path_buf();
        }
        if dir.join(".git").exists() {
            return dir.to_path_buf();
        }
    }
    start.to_path_buf()
}
