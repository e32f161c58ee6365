//! Rewriter execution
//!
//! Runs each planned invocation in order. No caching: every run re-executes
//! the rewriter.

use crate::domain::ports::{CommandRunner, FailureContext, FailureHandler};
use crate::domain::services::RewriteInvocation;
use crate::error::CompartResult;

use super::interrupt::Interrupt;

/// Run `invocations`, handing non-zero exits to `handler`.
///
/// Returns how many invocations succeeded.
pub fn run_rewriter(
    runner: &dyn CommandRunner,
    handler: &dyn FailureHandler,
    invocations: &[RewriteInvocation],
    interrupt: &Interrupt,
) -> CompartResult<usize> {
    let mut succeeded = 0;
    for invocation in invocations {
        interrupt.check()?;
        tracing::debug!(scope = ?invocation.scope, "rewriting");

        let status = runner.run(&invocation.command)?;
        if status.success() {
            succeeded += 1;
            continue;
        }

        interrupt.check()?;
        handler.handle(
            runner,
            FailureContext {
                command: &invocation.command,
                status,
            },
        )?;
    }
    Ok(succeeded)
}
