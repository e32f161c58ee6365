//! Native build driving
//!
//! Configure, build, and link steps for either tree. Every failure aborts
//! immediately with the tool's own exit code.

use std::path::{Path, PathBuf};

use crate::config::{BuildConfig, ProjectConfig, RewriterConfig};
use crate::domain::ports::{CommandRunner, FileSystem, ToolCommand};
use crate::error::{CompartError, CompartResult};

pub struct BuildDriver<'a> {
    runner: &'a dyn CommandRunner,
    fs: &'a dyn FileSystem,
    build: &'a BuildConfig,
    build_dir: &'a Path,
}

impl<'a> BuildDriver<'a> {
    pub fn new(
        runner: &'a dyn CommandRunner,
        fs: &'a dyn FileSystem,
        build: &'a BuildConfig,
        project: &'a ProjectConfig,
    ) -> Self {
        Self {
            runner,
            fs,
            build,
            build_dir: &project.build_dir,
        }
    }

    /// `<configure...> <build_dir> [reconfigure] [options...]` in `tree`.
    pub fn configure(&self, tree: &Path, options: &[String]) -> CompartResult<()> {
        let mut command = base(&self.build.configure, "build.configure")?.arg(self.build_dir);
        if self.fs.exists(&tree.join(self.build_dir)) && !self.build.reconfigure_flag.is_empty() {
            command = command.arg(&self.build.reconfigure_flag);
        }
        self.execute(command.args(options).current_dir(tree))
    }

    /// `<build...> <build_dir> [targets...]` in `tree`.
    pub fn compile(&self, tree: &Path) -> CompartResult<()> {
        let command = base(&self.build.build, "build.build")?
            .arg(self.build_dir)
            .args(&self.build.targets)
            .current_dir(tree);
        self.execute(command)
    }

    /// Compile the generated call-gate wrapper into a shared object inside the
    /// secondary build directory. Returns the library path.
    pub fn callgate_library(
        &self,
        secondary: &Path,
        rewriter: &RewriterConfig,
        runtime_include: &Path,
    ) -> CompartResult<PathBuf> {
        let source = callgate_source(secondary, rewriter);
        let out_dir = secondary.join(self.build_dir);
        self.fs.create_dir_all(&out_dir)?;
        let library = out_dir.join(&self.build.callgate_library);

        let command = ToolCommand::new(&self.build.cc)
            .args(&self.build.callgate_flags)
            .arg(format!("-I{}", runtime_include.display()))
            .arg(&source)
            .arg("-o")
            .arg(&library)
            .current_dir(secondary);
        self.execute(command)?;
        Ok(library)
    }

    fn execute(&self, command: ToolCommand) -> CompartResult<()> {
        let status = self.runner.run(&command)?;
        if status.success() {
            return Ok(());
        }
        Err(CompartError::ToolFailed {
            tool: command.name(),
            code: status.code,
        })
    }
}

/// `<secondary>/<callgate_dir>/<prefix>.c`
pub fn callgate_source(secondary: &Path, rewriter: &RewriterConfig) -> PathBuf {
    secondary
        .join(&rewriter.callgate_dir)
        .join(format!("{}.c", rewriter.output_prefix))
}

fn base(parts: &[String], key: &str) -> CompartResult<ToolCommand> {
    ToolCommand::from_parts(parts).ok_or_else(|| CompartError::ConfigInvalid {
        file: PathBuf::from(crate::config::Config::FILE_NAME),
        message: format!("{} must name a program", key),
    })
}
