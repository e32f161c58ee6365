//! Toolchain introspection

use std::path::{Path, PathBuf};

use crate::config::ToolchainConfig;
use crate::domain::ports::{CommandRunner, ToolCommand};
use crate::error::{CompartError, CompartResult};

/// Locate clang's resource headers: `<llvm libdir>/clang/<version>/include`.
///
/// A configured `resource_include` wins and skips `llvm-config` entirely.
pub fn resource_include(
    runner: &dyn CommandRunner,
    config: &ToolchainConfig,
    root: &Path,
) -> CompartResult<PathBuf> {
    if let Some(dir) = &config.resource_include {
        return Ok(root.join(dir));
    }

    let command = ToolCommand::new(&config.llvm_config).arg("--libdir");
    let (status, stdout) = runner.capture(&command)?;
    if !status.success() {
        return Err(CompartError::ToolFailed {
            tool: command.name(),
            code: status.code,
        });
    }

    let libdir = stdout.trim();
    if libdir.is_empty() {
        return Err(CompartError::ToolFailed {
            tool: command.name(),
            code: status.code,
        });
    }
    tracing::debug!(libdir, "llvm-config");

    Ok(PathBuf::from(libdir)
        .join("clang")
        .join(&config.clang_version)
        .join("include"))
}
