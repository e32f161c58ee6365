//! Secondary tree synchronization
//!
//! Keeps the rewrite target in step with the primary checkout: clone when
//! missing, otherwise stash local edits, pull with rebase, and restore the
//! stash. Conflicts are reported, never resolved.

use std::path::Path;

use crate::domain::ports::{CommandRunner, FileSystem, ToolCommand};
use crate::error::{CompartError, CompartResult};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// The tree did not exist and was cloned
    pub cloned: bool,
    /// Local changes were stashed and restored
    pub stashed: bool,
}

pub fn sync_secondary(
    runner: &dyn CommandRunner,
    fs: &dyn FileSystem,
    git: &str,
    primary: &Path,
    secondary: &Path,
) -> CompartResult<SyncReport> {
    if !fs.exists(&secondary.join(".git")) {
        let clone = ToolCommand::new(git).arg("clone").arg(primary).arg(secondary);
        let status = runner.run(&clone)?;
        if !status.success() {
            return Err(CompartError::ToolFailed {
                tool: clone.name(),
                code: status.code,
            });
        }
        tracing::info!("cloned {} into {}", primary.display(), secondary.display());
        return Ok(SyncReport {
            cloned: true,
            stashed: false,
        });
    }

    let git_in = |args: &[&str]| ToolCommand::new(git).args(args.iter().copied()).current_dir(secondary);

    let (status, porcelain) = runner.capture(&git_in(&["status", "--porcelain"]))?;
    check(status.code, "status")?;
    let dirty = !porcelain.trim().is_empty();

    if dirty {
        tracing::info!("stashing local changes in {}", secondary.display());
        step(runner, git_in(&["stash", "push", "--include-untracked"]), "stash push")?;
    }

    step(runner, git_in(&["pull", "--rebase"]), "pull --rebase")?;

    if dirty {
        step(runner, git_in(&["stash", "pop"]), "stash pop")?;
    }

    Ok(SyncReport {
        cloned: false,
        stashed: dirty,
    })
}

fn step(runner: &dyn CommandRunner, command: ToolCommand, name: &str) -> CompartResult<()> {
    let status = runner.run(&command)?;
    check(status.code, name)
}

fn check(code: Option<i32>, name: &str) -> CompartResult<()> {
    if code == Some(0) {
        return Ok(());
    }
    Err(CompartError::SyncConflict {
        step: name.to_string(),
        code,
    })
}
