//! Process runner backed by `std::process::Command`

use std::process::{Command, Stdio};

use crate::domain::ports::{CommandRunner, ToolCommand, ToolStatus};
use crate::error::{CompartError, CompartResult};

/// Runs tools on the host, one at a time.
///
/// In JSON mode child stdout is folded into stderr so the NDJSON event stream
/// on stdout stays parseable.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    json: bool,
}

impl SystemRunner {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    fn command(&self, tool: &ToolCommand) -> Command {
        let mut cmd = Command::new(&tool.program);
        cmd.args(&tool.args).stdin(Stdio::inherit());
        if let Some(dir) = &tool.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    fn spawn_error(tool: &ToolCommand, source: std::io::Error) -> CompartError {
        CompartError::ToolSpawn {
            tool: tool.name(),
            source,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, tool: &ToolCommand) -> CompartResult<ToolStatus> {
        tracing::info!("{}", tool);
        if !self.json {
            eprintln!("{}", tool);
        }

        let mut cmd = self.command(tool);
        if self.json {
            cmd.stdout(Stdio::from(std::io::stderr()));
        } else {
            cmd.stdout(Stdio::inherit());
        }
        cmd.stderr(Stdio::inherit());

        let status = cmd.status().map_err(|e| Self::spawn_error(tool, e))?;
        tracing::debug!(tool = %tool.name(), code = ?status.code(), "finished");
        Ok(ToolStatus {
            code: status.code(),
        })
    }

    fn capture(&self, tool: &ToolCommand) -> CompartResult<(ToolStatus, String)> {
        tracing::debug!("{}", tool);
        let output = self
            .command(tool)
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .output()
            .map_err(|e| Self::spawn_error(tool, e))?;
        Ok((
            ToolStatus {
                code: output.status.code(),
            },
            String::from_utf8_lossy(&output.stdout).into_owned(),
        ))
    }
}
