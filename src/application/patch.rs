//! Post-rewrite source patching

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::entities::SourcePatch;
use crate::domain::ports::{FileChange, FileSystem};
use crate::domain::services::{apply_patch, PatchOutcome};
use crate::error::CompartResult;

use super::diff::unified_diff;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchedFile {
    /// Path relative to the patched tree
    pub file: PathBuf,
    pub reason: Option<String>,
    pub change: FileChange,
    pub diff: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatchReport {
    pub entries: Vec<PatchedFile>,
}

impl PatchReport {
    pub fn applied(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.change == FileChange::Applied)
            .count()
    }
}

/// Apply `patches` in order to files under `tree`.
///
/// Each patch is written back before the next one is read, so earlier
/// patches stay applied when a later one mismatches. With `dry_run` the
/// edits accumulate in memory only.
pub fn apply_patches(
    fs: &dyn FileSystem,
    tree: &Path,
    patches: &[SourcePatch],
    dry_run: bool,
) -> CompartResult<PatchReport> {
    let mut pending: BTreeMap<PathBuf, String> = BTreeMap::new();
    let mut report = PatchReport::default();

    for patch in patches {
        let path = tree.join(&patch.file);
        let text = match pending.get(&path) {
            Some(text) => text.clone(),
            None => fs.read(&path)?,
        };

        let (change, diff) = match apply_patch(&text, patch)? {
            PatchOutcome::AlreadyApplied => {
                tracing::debug!("patch already applied to {}", patch.file.display());
                (FileChange::AlreadyApplied, None)
            }
            PatchOutcome::Applied(new_text) => {
                let diff = dry_run.then(|| unified_diff(&patch.file, &text, &new_text));
                if !dry_run {
                    fs.write(&path, &new_text)?;
                    tracing::info!("patched {}", patch.file.display());
                }
                pending.insert(path, new_text);
                (FileChange::Applied, diff)
            }
        };

        report.entries.push(PatchedFile {
            file: patch.file.clone(),
            reason: patch.reason.clone(),
            change,
            diff,
        });
    }
    Ok(report)
}
