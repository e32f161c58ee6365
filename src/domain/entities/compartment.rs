//! Compartment entity

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::CompartmentKey;

/// Outcome of looking up which compartment owns a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assignment {
    /// Directory not configured (or the path is excluded); the file stays in
    /// the implicit untrusted compartment.
    Unassigned,
    Assigned(CompartmentKey),
}

impl Assignment {
    pub fn key(self) -> Option<CompartmentKey> {
        match self {
            Assignment::Unassigned => None,
            Assignment::Assigned(key) => Some(key),
        }
    }
}

/// A group of source files sharing one protection key.
///
/// Members are root-relative and kept in a `BTreeSet` so rewriter
/// invocations list them in the same order on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compartment {
    pub key: CompartmentKey,
    /// Owning top-level directory
    pub name: String,
    /// Root-relative entry file, `<name>/<entry>`
    pub entry_file: PathBuf,
    pub members: BTreeSet<PathBuf>,
}

impl Compartment {
    pub fn new(key: CompartmentKey, name: impl Into<String>, entry_file: impl Into<PathBuf>) -> Self {
        Self {
            key,
            name: name.into(),
            entry_file: entry_file.into(),
            members: BTreeSet::new(),
        }
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.members.contains(path)
    }

    pub fn has_entry_file(&self) -> bool {
        self.contains(&self.entry_file)
    }

    /// Absolute member paths under `root`, in member order.
    pub fn absolute_members(&self, root: &Path) -> Vec<PathBuf> {
        self.members.iter().map(|m| root.join(m)).collect()
    }
}
