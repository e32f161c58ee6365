//! Domain Layer
//!
//! Compartment assignment, preamble text, patch application and rewriter
//! command lines. Nothing here touches the disk or spawns a process.
//!
//! ## Structure
//!
//! - `entities/` - Compartment, CompileCommand, SourcePatch
//! - `value_objects/` - CompartmentKey, RewriteMode, ContentHash, path helpers
//! - `services/` - assigner, preamble, patcher, keep policy, rewrite commands
//! - `ports/` - FileSystem, CommandRunner, FailureHandler

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
