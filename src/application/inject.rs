//! Header injection into compartment entry files
//!
//! Two phases: every entry file is read and its new text computed first, and
//! only then are files written. A bad entry file therefore leaves the tree
//! untouched.

use std::path::{Path, PathBuf};

use crate::config::PreambleConfig;
use crate::domain::ports::{FileChange, FileSystem};
use crate::domain::services::preamble::{self, Injection, PreambleSpec};
use crate::domain::services::Partition;
use crate::domain::value_objects::CompartmentKey;
use crate::error::{CompartError, CompartResult};

use super::diff::unified_diff;

/// Result of injecting one entry file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InjectedFile {
    /// Root-relative entry file
    pub path: PathBuf,
    pub key: CompartmentKey,
    pub is_binary: bool,
    pub change: FileChange,
    /// Unified diff when the file changes
    pub diff: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectReport {
    pub files: Vec<InjectedFile>,
}

impl InjectReport {
    pub fn written(&self) -> usize {
        self.files.iter().filter(|f| f.change.is_write()).count()
    }
}

/// Inject preambles into the entry files of `partition` under `tree`.
///
/// With `dry_run` nothing is written; the report carries the diffs.
pub fn inject_tree(
    fs: &dyn FileSystem,
    tree: &Path,
    partition: &Partition,
    config: &PreambleConfig,
    dry_run: bool,
) -> CompartResult<InjectReport> {
    let total = partition.total();
    let mut planned = Vec::with_capacity(total);

    for compartment in &partition.compartments {
        let path = tree.join(&compartment.entry_file);
        let text = fs.read(&path)?;
        let is_binary = preamble::defines_entry_point(&text, config);
        let spec = PreambleSpec {
            key: compartment.key,
            total_compartments: total,
            is_binary,
        };
        let injection = preamble::inject(&text, &preamble::render(&spec, config), config);
        planned.push((compartment, path, text, is_binary, injection));
    }

    let binaries: Vec<&PathBuf> = planned
        .iter()
        .filter(|(_, _, _, is_binary, _)| *is_binary)
        .map(|(c, _, _, _, _)| &c.entry_file)
        .collect();
    if binaries.len() > 1 {
        return Err(CompartError::ConfigInvalid {
            file: tree.to_path_buf(),
            message: format!(
                "more than one entry file defines '{}': {}",
                config.entry_marker,
                binaries
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        });
    }

    let mut report = InjectReport::default();
    for (compartment, path, text, is_binary, injection) in planned {
        let change = match &injection {
            Injection::Unchanged => FileChange::Unchanged,
            Injection::Inserted(_) => FileChange::Inserted,
            Injection::Replaced(_) => FileChange::Replaced,
        };
        let mut diff = None;
        if let Some(new_text) = injection.new_content() {
            if dry_run {
                diff = Some(unified_diff(&compartment.entry_file, &text, new_text));
            } else {
                fs.write(&path, new_text)?;
                tracing::info!(key = %compartment.key, "injected preamble into {}", path.display());
            }
        } else {
            tracing::debug!("{} already carries its preamble", path.display());
        }
        report.files.push(InjectedFile {
            path: compartment.entry_file.clone(),
            key: compartment.key,
            is_binary,
            change,
            diff,
        });
    }
    Ok(report)
}
