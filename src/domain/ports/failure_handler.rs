//! Failure Handler Port
//!
//! Decides what happens after the rewriter exits non-zero. Every handler ends
//! in an error; they differ in what they do first.

use super::command_runner::{CommandRunner, ToolCommand, ToolStatus};
use crate::error::{CompartError, CompartResult};

/// Context for a failed tool invocation
#[derive(Debug, Clone, Copy)]
pub struct FailureContext<'a> {
    pub command: &'a ToolCommand,
    pub status: ToolStatus,
}

impl FailureContext<'_> {
    /// The error a failed invocation ultimately turns into
    pub fn into_error(self) -> CompartError {
        CompartError::ToolFailed {
            tool: self.command.name(),
            code: self.status.code,
        }
    }
}

/// Trait for reacting to a failed rewriter run.
///
/// Implementations:
/// - `AbortOnFailure`: return the failure immediately
/// - `InspectOnFailure`: relaunch under a debugger, then return the failure
pub trait FailureHandler {
    fn handle(&self, runner: &dyn CommandRunner, failure: FailureContext<'_>)
        -> CompartResult<()>;
}

/// Default handler: surface the exit code and stop.
pub struct AbortOnFailure;

impl FailureHandler for AbortOnFailure {
    fn handle(
        &self,
        _runner: &dyn CommandRunner,
        failure: FailureContext<'_>,
    ) -> CompartResult<()> {
        Err(failure.into_error())
    }
}
