//! Allow-list for rewriter output
//!
//! The rewriter re-emits every file it touched. Only the paths listed here
//! make it from the staging tree into the secondary tree.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::config::KeepConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeepPolicy {
    files: BTreeSet<PathBuf>,
    dirs: Vec<PathBuf>,
}

impl KeepPolicy {
    pub fn new(files: impl IntoIterator<Item = PathBuf>, dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            files: files.into_iter().collect(),
            dirs: dirs.into_iter().collect(),
        }
    }

    pub fn from_config(config: &KeepConfig) -> Self {
        Self::new(config.files.iter().cloned(), config.dirs.iter().cloned())
    }

    /// Is the root-relative `path` kept?
    pub fn is_kept(&self, path: &Path) -> bool {
        self.files.contains(path) || self.dirs.iter().any(|dir| path.starts_with(dir))
    }
}
