//! Pipeline Event Port
//!
//! Observable progress for the orchestration pipeline. Drives the console
//! progress lines and the `--json` NDJSON stream.

use std::fmt;
use std::path::PathBuf;

use crate::domain::value_objects::CompartmentKey;

/// Pipeline stages in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Bootstrap,
    ReadDatabase,
    Partition,
    Sync,
    InjectPrimary,
    Rewrite,
    Merge,
    InjectSecondary,
    Patch,
    Callgates,
    Build,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Bootstrap => "bootstrap",
            Stage::ReadDatabase => "read-database",
            Stage::Partition => "partition",
            Stage::Sync => "sync",
            Stage::InjectPrimary => "inject-primary",
            Stage::Rewrite => "rewrite",
            Stage::Merge => "merge",
            Stage::InjectSecondary => "inject-secondary",
            Stage::Patch => "patch",
            Stage::Callgates => "callgates",
            Stage::Build => "build",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a file was touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileChange {
    Inserted,
    Replaced,
    Unchanged,
    Applied,
    AlreadyApplied,
}

impl FileChange {
    pub fn as_str(self) -> &'static str {
        match self {
            FileChange::Inserted => "inserted",
            FileChange::Replaced => "replaced",
            FileChange::Unchanged => "unchanged",
            FileChange::Applied => "applied",
            FileChange::AlreadyApplied => "already-applied",
        }
    }

    pub fn is_write(self) -> bool {
        matches!(self, FileChange::Inserted | FileChange::Replaced | FileChange::Applied)
    }
}

/// Event emitted during a pipeline run
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    StageStarted { stage: Stage },

    StageSkipped { stage: Stage, reason: String },

    /// Compartments created from the database
    Partitioned {
        compartments: Vec<(CompartmentKey, String, usize)>,
        unassigned: usize,
    },

    /// Preamble injection or patch result for one file
    FileTouched {
        stage: Stage,
        path: PathBuf,
        change: FileChange,
    },

    /// Staging tree merged into the secondary tree
    Merged { copied: usize, discarded: usize },

    /// An artifact was produced
    Produced { stage: Stage, path: PathBuf },

    Completed { secondary: PathBuf },
}

/// Trait for receiving pipeline events
///
/// Implementations can be:
/// - ConsoleEventSink: progress lines on stdout
/// - JsonEventSink: NDJSON event stream
/// - NoopEventSink: silent operation
pub trait EventSink {
    fn on_event(&self, event: PipelineEvent);
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl EventSink for NoopEventSink {
    fn on_event(&self, _event: PipelineEvent) {}
}
