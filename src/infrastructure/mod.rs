//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `fs/` - File system implementations (Local, Memory)
//! - `process/` - External process runners and toolchain lookups
//! - `failure/` - Rewriter failure handlers
//! - `events/` - Console and NDJSON event sinks

pub mod events;
pub mod failure;
pub mod fs;
pub mod process;

// Re-export for convenience
pub use events::{ConsoleEventSink, JsonEventSink};
pub use failure::{handler_for, InspectOnFailure};
pub use fs::{LocalFs, MemoryFs};
pub use process::{ScriptedRunner, SystemRunner};
