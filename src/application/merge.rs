//! Allow-list merge of the staging tree into the secondary tree

use std::path::{Path, PathBuf};

use crate::domain::ports::{FileSystem, FsError};
use crate::domain::services::KeepPolicy;
use crate::error::CompartResult;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Root-relative paths copied into the secondary tree
    pub copied: Vec<PathBuf>,
    /// Rewriter output left behind in the staging tree
    pub discarded: Vec<PathBuf>,
}

/// Copy the kept part of `stage` into `secondary`.
///
/// A missing staging tree means the rewriter emitted nothing; that is an
/// empty merge, not an error.
pub fn merge_kept(
    fs: &dyn FileSystem,
    stage: &Path,
    secondary: &Path,
    policy: &KeepPolicy,
) -> CompartResult<MergeReport> {
    let files = match fs.list_files(stage) {
        Ok(files) => files,
        Err(FsError::NotFound(_)) => {
            tracing::warn!("staging tree {} is empty", stage.display());
            Vec::new()
        }
        Err(err) => return Err(err.into()),
    };

    let mut report = MergeReport::default();
    for relative in files {
        if policy.is_kept(&relative) {
            fs.copy(&stage.join(&relative), &secondary.join(&relative))?;
            tracing::debug!("kept {}", relative.display());
            report.copied.push(relative);
        } else {
            report.discarded.push(relative);
        }
    }
    tracing::info!(
        copied = report.copied.len(),
        discarded = report.discarded.len(),
        "merged rewriter output"
    );
    Ok(report)
}
