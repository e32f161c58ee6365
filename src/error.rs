//! Error types for compart
//!
//! Library errors use `thiserror`; the binary wraps them in `anyhow` at the
//! command layer and recovers the typed error for rendering and exit codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::domain::ports::FsError;

/// Result type alias for compart operations
pub type CompartResult<T> = Result<T, CompartError>;

/// Coarse error taxonomy used for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing/malformed compile database or compartment configuration
    Configuration,
    /// An external process exited non-zero or could not be started
    ExternalTool,
    /// A literal patch pattern was not found
    PatchMismatch,
    /// Stash / rebase / stash-pop failed in the secondary tree
    SyncConflict,
    /// Operator interrupt or plain I/O trouble
    Runtime,
}

impl ErrorCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "configuration",
            ErrorCategory::ExternalTool => "external-tool",
            ErrorCategory::PatchMismatch => "patch-mismatch",
            ErrorCategory::SyncConflict => "sync-conflict",
            ErrorCategory::Runtime => "runtime",
        }
    }
}

/// Main error type for compart operations
#[derive(Error, Debug)]
pub enum CompartError {
    /// Configuration file could not be parsed or failed validation
    #[error("invalid configuration in {file}: {message}")]
    ConfigInvalid { file: PathBuf, message: String },

    /// Compile database not found
    #[error("compilation database not found: {path} (run the bootstrap build first)")]
    CompileDbMissing { path: PathBuf },

    /// Compile database is not a JSON array of records with a `file` field
    #[error("invalid compilation database {path}: {message}")]
    CompileDbInvalid { path: PathBuf, message: String },

    /// Source path is absolute and not under the project root
    #[error("source '{path}' is outside the project root '{root}'")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    /// Configured entry file is not among the compartment's sources
    #[error("entry file '{entry}' of compartment '{compartment}' is not in its compiled sources")]
    EntryFileMissing { compartment: String, entry: PathBuf },

    /// Key 0 is the implicit untrusted compartment
    #[error("compartment '{compartment}' uses reserved key 0")]
    ReservedKey { compartment: String },

    /// Two directories map to the same key
    #[error("compartments '{first}' and '{second}' share key {key}")]
    DuplicateKey {
        key: u32,
        first: String,
        second: String,
    },

    /// External tool exited non-zero
    #[error("{tool} failed with exit code {}", display_code(.code))]
    ToolFailed { tool: String, code: Option<i32> },

    /// External tool could not be started
    #[error("failed to run {tool}: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// Expected literal substring absent before patching
    #[error("patch target {file} does not contain expected text: {pattern:?}")]
    PatchMismatch { file: PathBuf, pattern: String },

    /// Secondary tree synchronization failed
    #[error("secondary tree sync failed during '{step}' (exit code {}); resolve it manually", display_code(.code))]
    SyncConflict { step: String, code: Option<i32> },

    /// Operator interrupted the run
    #[error("interrupted")]
    Interrupted,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File system port error
    #[error("{0}")]
    Fs(#[from] FsError),
}

fn display_code(code: &Option<i32>) -> String {
    code.map(|c| c.to_string())
        .unwrap_or_else(|| "none (killed by signal)".to_string())
}

impl CompartError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CompartError::ConfigInvalid { .. }
            | CompartError::CompileDbMissing { .. }
            | CompartError::CompileDbInvalid { .. }
            | CompartError::PathOutsideRoot { .. }
            | CompartError::EntryFileMissing { .. }
            | CompartError::ReservedKey { .. }
            | CompartError::DuplicateKey { .. } => ErrorCategory::Configuration,
            CompartError::ToolFailed { .. } | CompartError::ToolSpawn { .. } => {
                ErrorCategory::ExternalTool
            }
            CompartError::PatchMismatch { .. } => ErrorCategory::PatchMismatch,
            CompartError::SyncConflict { .. } => ErrorCategory::SyncConflict,
            CompartError::Interrupted
            | CompartError::Io(_)
            | CompartError::Json(_)
            | CompartError::Fs(_) => ErrorCategory::Runtime,
        }
    }

    /// Process exit code: the failing tool's own code when known.
    pub fn exit_code(&self) -> i32 {
        match self {
            CompartError::ToolFailed { code: Some(c), .. }
            | CompartError::SyncConflict { code: Some(c), .. }
                if *c != 0 =>
            {
                *c
            }
            CompartError::Interrupted => 130,
            _ => 1,
        }
    }
}
