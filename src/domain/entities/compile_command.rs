//! Compilation database record

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One entry of `compile_commands.json`.
///
/// Only `file` is required. Unknown fields are ignored here; the canonicalizer
/// works on raw JSON so it never drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileCommand {
    pub file: PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Vec<String>>,
}

impl CompileCommand {
    /// The source path with the record's `directory` applied.
    ///
    /// Falls back to `root` when the record carries no directory.
    pub fn resolved_file(&self, root: &Path) -> PathBuf {
        if self.file.is_absolute() {
            return self.file.clone();
        }
        match &self.directory {
            Some(dir) if dir.is_absolute() => dir.join(&self.file),
            Some(dir) => root.join(dir).join(&self.file),
            None => root.join(&self.file),
        }
    }
}
