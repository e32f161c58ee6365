//! Domain Entities
//!
//! - `Compartment` - a key, its owning directory, entry file and members
//! - `CompileCommand` - one record of the compilation database
//! - `SourcePatch` - a literal post-rewrite fix-up

mod compartment;
mod compile_command;
mod source_patch;

pub use compartment::{Assignment, Compartment};
pub use compile_command::CompileCommand;
pub use source_patch::SourcePatch;
