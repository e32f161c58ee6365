//! Command runner port - external process execution
//!
//! Every external tool (configure, build, git, llvm-config, the rewriter, the
//! C compiler, the debugger launcher) goes through this trait so pipelines
//! can be driven by a scripted fake in tests.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::CompartResult;

/// A fully built external command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Working directory; inherits the orchestrator's when `None`
    pub cwd: Option<PathBuf>,
}

impl ToolCommand {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
        }
    }

    /// Build from a configured `[program, args...]` list.
    pub fn from_parts(parts: &[String]) -> Option<Self> {
        let (program, args) = parts.split_first()?;
        Some(Self::new(program).args(args))
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Short tool name for error messages (program file name)
    pub fn name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .unwrap_or(self.program.as_os_str())
            .to_string_lossy()
            .into_owned()
    }

    /// Count how often `arg` appears in the argument vector
    pub fn count_arg(&self, arg: impl AsRef<OsStr>) -> usize {
        let arg = arg.as_ref();
        self.args.iter().filter(|a| a.as_os_str() == arg).count()
    }

    /// The same command prefixed by a launcher such as `gdb --args`.
    pub fn wrapped_in(&self, launcher: &[String]) -> Option<ToolCommand> {
        let mut wrapped = ToolCommand::from_parts(launcher)?;
        wrapped.args.push(self.program.clone());
        wrapped.args.extend(self.args.iter().cloned());
        wrapped.cwd = self.cwd.clone();
        Some(wrapped)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "> {}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Exit status of a finished tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    /// `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl ToolStatus {
    pub const SUCCESS: ToolStatus = ToolStatus { code: Some(0) };

    pub fn exited(code: i32) -> Self {
        Self { code: Some(code) }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands, one at a time.
pub trait CommandRunner {
    /// Run with inherited stdio and wait for the exit status.
    ///
    /// Only failure to start the process is an error; a non-zero exit is
    /// reported through the returned status.
    fn run(&self, command: &ToolCommand) -> CompartResult<ToolStatus>;

    /// Run and capture stdout (stderr inherited).
    fn capture(&self, command: &ToolCommand) -> CompartResult<(ToolStatus, String)>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &ToolCommand) -> CompartResult<ToolStatus> {
        (**self).run(command)
    }

    fn capture(&self, command: &ToolCommand) -> CompartResult<(ToolStatus, String)> {
        (**self).capture(command)
    }
}
