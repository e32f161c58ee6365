//! Root-relative path handling
//!
//! Compile databases mix absolute paths, paths relative to the record's
//! `directory`, and `..` hops through build directories. Everything here is
//! lexical: the files may not exist yet (or may live on another machine).

use std::path::{Component, Path, PathBuf};

/// Error when a path cannot be expressed relative to the root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// Path resolves outside the root
    EscapesRoot { path: PathBuf, root: PathBuf },
    /// Path is empty after normalization
    Empty,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::EscapesRoot { path, root } => write!(
                f,
                "Path '{}' is outside root '{}'",
                path.display(),
                root.display()
            ),
            PathError::Empty => write!(f, "Path is empty"),
        }
    }
}

impl std::error::Error for PathError {}

/// Collapse `.` and `..` components without touching the filesystem.
///
/// A `..` that would climb above the start of a relative path is kept, so
/// `../a` stays `../a`; above `/` it is dropped.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

/// Express `path` relative to `root`.
///
/// Relative inputs are taken to be relative to `root` already. Absolute inputs
/// must lie under `root` once both are normalized.
pub fn relative_to_root(path: &Path, root: &Path) -> Result<PathBuf, PathError> {
    let root = normalize_lexically(root);
    let full = if path.is_absolute() {
        normalize_lexically(path)
    } else {
        normalize_lexically(&root.join(path))
    };

    let relative = full
        .strip_prefix(&root)
        .map_err(|_| PathError::EscapesRoot {
            path: path.to_path_buf(),
            root: root.clone(),
        })?;

    if relative.as_os_str().is_empty() {
        return Err(PathError::Empty);
    }
    Ok(relative.to_path_buf())
}

/// First component of a relative path as a string (the owning directory).
pub fn top_level_dir(path: &Path) -> Option<&str> {
    match path.components().next()? {
        Component::Normal(name) => name.to_str(),
        _ => None,
    }
}
