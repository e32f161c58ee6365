//! In-memory file system
//!
//! Used by unit and scenario tests. Every successful `write` is recorded so
//! tests can assert that nothing was written.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::domain::ports::file_system::{FileSystem, FsError, FsResult};

/// Mock file system keyed by absolute path.
///
/// Uses `Arc<Mutex<>>` internally so it can be cloned and shared.
#[derive(Debug, Clone, Default)]
pub struct MemoryFs {
    files: Arc<Mutex<BTreeMap<PathBuf, String>>>,
    writes: Arc<Mutex<Vec<PathBuf>>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a file without recording a write
    pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
        if let Ok(mut files) = self.files.lock() {
            files.insert(path.into(), content.into());
        }
    }

    pub fn get(&self, path: &Path) -> Option<String> {
        self.files.lock().ok()?.get(path).cloned()
    }

    /// Paths passed to `write`, in call order
    pub fn writes(&self) -> Vec<PathBuf> {
        self.writes.lock().map(|w| w.clone()).unwrap_or_default()
    }

    fn poisoned() -> FsError {
        FsError::Other("memory fs lock poisoned".to_string())
    }
}

impl FileSystem for MemoryFs {
    fn read(&self, path: &Path) -> FsResult<String> {
        let files = self.files.lock().map_err(|_| Self::poisoned())?;
        files
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    fn write(&self, path: &Path, content: &str) -> FsResult<()> {
        let mut files = self.files.lock().map_err(|_| Self::poisoned())?;
        files.insert(path.to_path_buf(), content.to_string());
        self.writes
            .lock()
            .map_err(|_| Self::poisoned())?
            .push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files
            .lock()
            .map(|files| files.keys().any(|p| p.starts_with(path)))
            .unwrap_or(false)
    }

    fn create_dir_all(&self, _path: &Path) -> FsResult<()> {
        Ok(())
    }

    fn list_files(&self, dir: &Path) -> FsResult<Vec<PathBuf>> {
        let files = self.files.lock().map_err(|_| Self::poisoned())?;
        let listed: Vec<PathBuf> = files
            .keys()
            .filter_map(|p| p.strip_prefix(dir).ok())
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .collect();
        if listed.is_empty() {
            return Err(FsError::NotFound(dir.to_path_buf()));
        }
        Ok(listed)
    }

    fn remove_dir_all(&self, dir: &Path) -> FsResult<()> {
        let mut files = self.files.lock().map_err(|_| Self::poisoned())?;
        files.retain(|path, _| !path.starts_with(dir));
        Ok(())
    }
}
