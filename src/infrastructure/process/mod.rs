//! External process execution
//!
//! - `SystemRunner` - real processes
//! - `ScriptedRunner` - recorded fake with canned exit codes
//! - `toolchain` - `llvm-config` lookups

mod scripted;
mod system;
pub mod toolchain;

pub use scripted::ScriptedRunner;
pub use system::SystemRunner;
