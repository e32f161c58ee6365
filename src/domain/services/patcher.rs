//! Literal find/replace patching

use crate::domain::entities::SourcePatch;
use crate::error::{CompartError, CompartResult};

/// Result of applying one patch to a file's text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// First occurrence of `find` replaced
    Applied(String),
    /// `replace` is already in place from an earlier run
    AlreadyApplied,
}

/// Apply `patch` to `text`.
///
/// Only the first occurrence is replaced. Only wrapping patches (where
/// `replace` contains `find`, such as `IA2_FNPTR_WRAPPER(dlsym(..))`) can be
/// recognised as already applied. For any other patch a missing `find` is a
/// mismatch, even if the replacement text happens to occur in the file.
pub fn apply_patch(text: &str, patch: &SourcePatch) -> CompartResult<PatchOutcome> {
    if is_applied(text, patch) {
        return Ok(PatchOutcome::AlreadyApplied);
    }
    if !text.contains(patch.find.as_str()) {
        return Err(CompartError::PatchMismatch {
            file: patch.file.clone(),
            pattern: patch.find.clone(),
        });
    }
    Ok(PatchOutcome::Applied(text.replacen(
        patch.find.as_str(),
        &patch.replace,
        1,
    )))
}

fn is_applied(text: &str, patch: &SourcePatch) -> bool {
    patch.replace.contains(patch.find.as_str()) && text.contains(patch.replace.as_str())
}
