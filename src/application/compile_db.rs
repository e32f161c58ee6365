//! Compilation database reading and canonicalization

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::domain::entities::CompileCommand;
use crate::domain::ports::FileSystem;
use crate::domain::value_objects::{normalize_lexically, relative_to_root, PathError};
use crate::error::{CompartError, CompartResult};

/// Root-relative source paths named by the database, in record order.
///
/// Duplicates (the same file compiled once per bit depth) are kept; the
/// assigner collapses them.
pub fn read_sources(fs: &dyn FileSystem, db_path: &Path, root: &Path) -> CompartResult<Vec<PathBuf>> {
    let records = read_records(fs, db_path)?;
    records
        .iter()
        .map(|record| {
            let resolved = record.resolved_file(root);
            relative_to_root(&resolved, root).map_err(|err| match err {
                PathError::EscapesRoot { .. } => CompartError::PathOutsideRoot {
                    path: resolved.clone(),
                    root: root.to_path_buf(),
                },
                PathError::Empty => CompartError::CompileDbInvalid {
                    path: db_path.to_path_buf(),
                    message: format!("record for '{}' names the root itself", record.file.display()),
                },
            })
        })
        .collect()
}

pub fn read_records(fs: &dyn FileSystem, db_path: &Path) -> CompartResult<Vec<CompileCommand>> {
    let text = load(fs, db_path)?;
    serde_json::from_str(&text).map_err(|e| CompartError::CompileDbInvalid {
        path: db_path.to_path_buf(),
        message: e.to_string(),
    })
}

fn load(fs: &dyn FileSystem, db_path: &Path) -> CompartResult<String> {
    if !fs.exists(db_path) {
        return Err(CompartError::CompileDbMissing {
            path: db_path.to_path_buf(),
        });
    }
    Ok(fs.read(db_path)?)
}

/// Summary of a canonicalization pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Canonicalized {
    pub records: usize,
    /// Records whose `file` or `directory` changed
    pub rewritten: usize,
}

/// Rewrite the database in place so each record's `file` and `directory` are
/// absolute and lexically normalized.
///
/// Works on raw JSON so fields this crate does not model (`output`, tool
/// specific extensions) survive untouched. The file is only written when
/// something changed.
pub fn canonicalize_database(fs: &dyn FileSystem, db_path: &Path, root: &Path) -> CompartResult<Canonicalized> {
    let text = load(fs, db_path)?;
    let invalid = |message: String| CompartError::CompileDbInvalid {
        path: db_path.to_path_buf(),
        message,
    };

    let mut doc: Value = serde_json::from_str(&text).map_err(|e| invalid(e.to_string()))?;
    let records = doc
        .as_array_mut()
        .ok_or_else(|| invalid("expected a JSON array of records".to_string()))?;

    let root = normalize_lexically(root);
    let mut rewritten = 0;
    for (index, record) in records.iter_mut().enumerate() {
        let object = record
            .as_object_mut()
            .ok_or_else(|| invalid(format!("record {} is not an object", index)))?;

        let directory = match object.get("directory") {
            Some(Value::String(dir)) => Some(normalize_lexically(&root.join(dir))),
            Some(_) => return Err(invalid(format!("record {} has a non-string directory", index))),
            None => None,
        };
        let file = match object.get("file") {
            Some(Value::String(file)) => {
                let base = directory.as_deref().unwrap_or(&root);
                normalize_lexically(&base.join(file))
            }
            _ => return Err(invalid(format!("record {} has no file", index))),
        };

        let mut changed = set_path(object, "file", &file);
        if let Some(dir) = &directory {
            changed |= set_path(object, "directory", dir);
        }
        if changed {
            rewritten += 1;
        }
    }
    let count = records.len();

    if rewritten > 0 {
        let mut out = serde_json::to_string_pretty(&doc)?;
        out.push('\n');
        fs.write(db_path, &out)?;
    }
    tracing::debug!(records = count, rewritten, "canonicalized {}", db_path.display());

    Ok(Canonicalized {
        records: count,
        rewritten,
    })
}

fn set_path(object: &mut serde_json::Map<String, Value>, key: &str, path: &Path) -> bool {
    let value = Value::String(path.to_string_lossy().into_owned());
    if object.get(key) == Some(&value) {
        return false;
    }
    object.insert(key.to_string(), value);
    true
}
