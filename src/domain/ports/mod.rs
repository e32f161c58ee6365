//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod command_runner;
pub mod failure_handler;
pub mod file_system;
pub mod pipeline_events;

pub use command_runner::{CommandRunner, ToolCommand, ToolStatus};
pub use failure_handler::{AbortOnFailure, FailureContext, FailureHandler};
pub use file_system::{FileSystem, FsError, FsResult};
pub use pipeline_events::{EventSink, FileChange, NoopEventSink, PipelineEvent, Stage};
