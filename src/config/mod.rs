//! Configuration module for compart
//!
//! Configuration hierarchy:
//! 1. CLI flags (highest priority, applied by the binary)
//! 2. Environment variables (COMPART_*)
//! 3. Project config (`compart.toml` in the project root, or `--config`)
//! 4. Built-in defaults (lowest priority)

mod loader;
mod types;

pub use crate::domain::value_objects::ConfigWarning;

pub use loader::{load_for_project, load_with_warnings, with_env_overrides};
pub use types::{
    BuildConfig, CompartmentConfig, Config, KeepConfig, PreambleConfig, ProjectConfig,
    RewriterConfig, SyncConfig, ToolchainConfig,
};
