//! Inspect-on-failure handler
//!
//! Relaunches the failed rewriter command under a debugger launcher so the
//! crash can be examined, then reports the original failure.

use is_terminal::IsTerminal;

use crate::domain::ports::{CommandRunner, FailureContext, FailureHandler};
use crate::error::CompartResult;

pub struct InspectOnFailure {
    /// Launcher prepended to the failed command, e.g. `gdb --args`
    debugger: Vec<String>,
    /// Ask before launching; off in tests and when scripted
    confirm: bool,
    /// Stdin is a terminal; the debugger needs one
    interactive: bool,
}

impl InspectOnFailure {
    pub fn new(debugger: Vec<String>) -> Self {
        Self {
            debugger,
            confirm: true,
            interactive: std::io::stdin().is_terminal(),
        }
    }

    /// Launch without prompting, regardless of the terminal check.
    pub fn unattended(debugger: Vec<String>) -> Self {
        Self {
            debugger,
            confirm: false,
            interactive: true,
        }
    }

    fn confirmed(&self, tool: &str) -> bool {
        if !self.confirm {
            return true;
        }
        dialoguer::Confirm::new()
            .with_prompt(format!("{} failed. Relaunch under {}?", tool, self.debugger.join(" ")))
            .default(true)
            .interact()
            .unwrap_or(false)
    }
}

impl FailureHandler for InspectOnFailure {
    fn handle(&self, runner: &dyn CommandRunner, failure: FailureContext<'_>) -> CompartResult<()> {
        if !self.interactive {
            tracing::warn!("stdin is not a terminal; not launching the debugger");
            return Err(failure.into_error());
        }

        let Some(wrapped) = failure.command.wrapped_in(&self.debugger) else {
            tracing::warn!("no debugger launcher configured");
            return Err(failure.into_error());
        };

        if self.confirmed(&failure.command.name()) {
            let status = runner.run(&wrapped)?;
            tracing::info!(code = ?status.code, "debugger session ended");
        }

        Err(failure.into_error())
    }
}
