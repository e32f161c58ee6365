//! Domain Services
//!
//! Pure business logic over domain entities. No I/O: callers read files,
//! hand text in and write the returned text back.

pub mod assigner;
pub mod keep_policy;
pub mod patcher;
pub mod preamble;
pub mod rewrite_command;

pub use assigner::{assign, partition, Partition};
pub use keep_policy::KeepPolicy;
pub use patcher::{apply_patch, PatchOutcome};
pub use preamble::{Injection, PreambleSpec};
pub use rewrite_command::{
    plan_invocations, rewrite_command, RewriteInvocation, RewriteLayout, RewriteScope,
};
