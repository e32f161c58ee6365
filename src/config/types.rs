//! Configuration type definitions

use std::collections::BTreeMap;
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::entities::SourcePatch;
use crate::domain::value_objects::{
    normalize_lexically, CompartmentKey, ConfigWarning, FailurePolicy, RewriteMode,
};
use crate::error::{CompartError, CompartResult};

use super::loader;

/// Project layout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Build output directory, relative to each tree root
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    /// Compile database file name inside `build_dir`
    #[serde(default = "default_compile_db")]
    pub compile_db: PathBuf,

    /// Secondary working copy; defaults to `../<root name>-compart`
    #[serde(default)]
    pub secondary_tree: Option<PathBuf>,

    /// Where the rewriter writes rewritten sources before the keep-merge
    #[serde(default = "default_stage_dir")]
    pub stage_dir: PathBuf,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            compile_db: default_compile_db(),
            secondary_tree: None,
            stage_dir: default_stage_dir(),
        }
    }
}

fn default_build_dir() -> PathBuf {
    PathBuf::from("build")
}

fn default_compile_db() -> PathBuf {
    PathBuf::from("compile_commands.json")
}

fn default_stage_dir() -> PathBuf {
    PathBuf::from("build/compart-rewritten")
}

/// One `[compartments.<dir>]` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompartmentConfig {
    pub key: CompartmentKey,
    /// Entry file name relative to the compartment directory
    pub entry: PathBuf,
    /// Substrings; matching member paths are left out of the compartment
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl CompartmentConfig {
    pub fn new(key: u32, entry: impl Into<PathBuf>) -> Self {
        Self {
            key: CompartmentKey::new(key),
            entry: entry.into(),
            exclude: Vec::new(),
        }
    }
}

fn default_compartments() -> BTreeMap<String, CompartmentConfig> {
    let mut map = BTreeMap::new();
    map.insert("src".to_string(), CompartmentConfig::new(2, "lib.c"));
    map.insert("tools".to_string(), CompartmentConfig::new(1, "dav1d.c"));
    map
}

/// Generated preamble tokens
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreambleConfig {
    /// Feature macro guarding the whole preamble
    #[serde(default = "default_guard")]
    pub guard: String,

    #[serde(default = "default_runtime_header")]
    pub runtime_header: String,

    #[serde(default = "default_init_include")]
    pub init_include: String,

    /// Substring marking the file that defines the process entry point
    #[serde(default = "default_entry_marker")]
    pub entry_marker: String,
}

impl Default for PreambleConfig {
    fn default() -> Self {
        Self {
            guard: default_guard(),
            runtime_header: default_runtime_header(),
            init_include: default_init_include(),
            entry_marker: default_entry_marker(),
        }
    }
}

fn default_guard() -> String {
    "IA2_ENABLE".to_string()
}

fn default_runtime_header() -> String {
    "ia2.h".to_string()
}

fn default_init_include() -> String {
    "ia2_compartment_init.inc".to_string()
}

fn default_entry_marker() -> String {
    "int main".to_string()
}

/// External rewriter invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewriterConfig {
    #[serde(default = "default_rewriter_binary")]
    pub binary: PathBuf,

    /// Runtime headers passed as `-I`
    #[serde(default = "default_runtime_include")]
    pub runtime_include: PathBuf,

    /// Directory (relative to the secondary tree) receiving the call-gate wrapper
    #[serde(default = "default_callgate_dir")]
    pub callgate_dir: PathBuf,

    #[serde(default = "default_output_prefix")]
    pub output_prefix: String,

    #[serde(default)]
    pub mode: RewriteMode,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    /// Launcher prepended to the rewriter command for `inspect`
    #[serde(default = "default_debugger")]
    pub debugger: Vec<String>,

    /// C dialect the runtime headers need
    #[serde(default = "default_std")]
    pub std: String,

    #[serde(default = "default_warning_suppressions")]
    pub warning_suppressions: Vec<String>,

    /// Passed as `-isystem <dir>` ahead of the clang resource headers
    #[serde(default = "default_fixed_includes")]
    pub fixed_includes: Vec<String>,

    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for RewriterConfig {
    fn default() -> Self {
        Self {
            binary: default_rewriter_binary(),
            runtime_include: default_runtime_include(),
            callgate_dir: default_callgate_dir(),
            output_prefix: default_output_prefix(),
            mode: RewriteMode::default(),
            on_failure: FailurePolicy::default(),
            debugger: default_debugger(),
            std: default_std(),
            warning_suppressions: default_warning_suppressions(),
            fixed_includes: default_fixed_includes(),
            extra_args: Vec::new(),
        }
    }
}

fn default_rewriter_binary() -> PathBuf {
    PathBuf::from("../ia2/build/tools/rewriter/ia2-rewriter")
}

fn default_runtime_include() -> PathBuf {
    PathBuf::from("../ia2/runtime/libia2/include")
}

fn default_callgate_dir() -> PathBuf {
    PathBuf::from("ia2")
}

fn default_output_prefix() -> String {
    "callgate_wrapper".to_string()
}

fn default_debugger() -> Vec<String> {
    vec!["gdb".to_string(), "--args".to_string()]
}

fn default_std() -> String {
    "gnu11".to_string()
}

fn default_warning_suppressions() -> Vec<String> {
    [
        "-Wno-error=missing-prototypes",
        "-Wno-missing-prototypes",
        "-Wno-undef",
        "-Wno-strict-prototypes",
        "-Wno-unknown-warning-option",
        "-Wno-macro-redefined",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_fixed_includes() -> Vec<String> {
    vec!["include-fixed".to_string()]
}

/// Toolchain introspection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolchainConfig {
    #[serde(default = "default_llvm_config")]
    pub llvm_config: PathBuf,

    /// Major version in `<libdir>/clang/<version>/include`
    #[serde(default = "default_clang_version")]
    pub clang_version: String,

    /// Skip `llvm-config` and use this resource include directory directly
    #[serde(default)]
    pub resource_include: Option<PathBuf>,
}

impl Default for ToolchainConfig {
    fn default() -> Self {
        Self {
            llvm_config: default_llvm_config(),
            clang_version: default_clang_version(),
            resource_include: None,
        }
    }
}

fn default_llvm_config() -> PathBuf {
    PathBuf::from("llvm-config")
}

fn default_clang_version() -> String {
    "18".to_string()
}

/// Native build system commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Configure command; the build dir is appended
    #[serde(default = "default_configure")]
    pub configure: Vec<String>,

    /// Appended to `configure` when the build dir already exists
    #[serde(default = "default_reconfigure_flag")]
    pub reconfigure_flag: String,

    /// Build command; the build dir is appended
    #[serde(default = "default_build")]
    pub build: Vec<String>,

    /// Specific targets appended to the build command
    #[serde(default)]
    pub targets: Vec<String>,

    /// Extra configure options that switch compartmentalization on
    #[serde(default = "default_compartment_options")]
    pub compartment_options: Vec<String>,

    #[serde(default = "default_cc")]
    pub cc: String,

    #[serde(default = "default_callgate_flags")]
    pub callgate_flags: Vec<String>,

    /// Output name of the call-gate shared object inside the secondary build dir
    #[serde(default = "default_callgate_library")]
    pub callgate_library: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            configure: default_configure(),
            reconfigure_flag: default_reconfigure_flag(),
            build: default_build(),
            targets: Vec::new(),
            compartment_options: default_compartment_options(),
            cc: default_cc(),
            callgate_flags: default_callgate_flags(),
            callgate_library: default_callgate_library(),
        }
    }
}

fn default_configure() -> Vec<String> {
    vec!["meson".to_string(), "setup".to_string()]
}

fn default_reconfigure_flag() -> String {
    "--reconfigure".to_string()
}

fn default_build() -> Vec<String> {
    vec!["ninja".to_string(), "-C".to_string()]
}

fn default_compartment_options() -> Vec<String> {
    vec!["-Dia2_enable=true".to_string()]
}

fn default_cc() -> String {
    "clang".to_string()
}

fn default_callgate_flags() -> Vec<String> {
    vec![
        "-shared".to_string(),
        "-fPIC".to_string(),
        "-Wl,-z,now".to_string(),
    ]
}

fn default_callgate_library() -> String {
    "libcallgates.so".to_string()
}

/// Secondary tree version control
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default = "default_git")]
    pub git: String,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self { git: default_git() }
    }
}

fn default_git() -> String {
    "git".to_string()
}

/// Rewriter output that survives into the secondary tree
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeepConfig {
    #[serde(default = "default_keep_files")]
    pub files: Vec<PathBuf>,

    #[serde(default = "default_keep_dirs")]
    pub dirs: Vec<PathBuf>,
}

impl Default for KeepConfig {
    fn default() -> Self {
        Self {
            files: default_keep_files(),
            dirs: default_keep_dirs(),
        }
    }
}

fn default_keep_files() -> Vec<PathBuf> {
    vec![PathBuf::from("src/lib.c")]
}

fn default_keep_dirs() -> Vec<PathBuf> {
    vec![PathBuf::from("tools")]
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: ProjectConfig,

    #[serde(default = "default_compartments")]
    pub compartments: BTreeMap<String, CompartmentConfig>,

    #[serde(default)]
    pub preamble: PreambleConfig,

    #[serde(default)]
    pub rewriter: RewriterConfig,

    #[serde(default)]
    pub toolchain: ToolchainConfig,

    #[serde(default)]
    pub build: BuildConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub keep: KeepConfig,

    /// Overrides the built-in patch list when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patches: Option<Vec<SourcePatch>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            compartments: default_compartments(),
            preamble: PreambleConfig::default(),
            rewriter: RewriterConfig::default(),
            toolchain: ToolchainConfig::default(),
            build: BuildConfig::default(),
            sync: SyncConfig::default(),
            keep: KeepConfig::default(),
            patches: None,
        }
    }
}

impl Config {
    /// File name looked up in the project root
    pub const FILE_NAME: &'static str = "compart.toml";

    /// Load configuration and collect unknown-key warnings
    pub fn load_with_warnings(path: &Path) -> CompartResult<(Self, Vec<ConfigWarning>)> {
        loader::load_with_warnings(path)
    }

    /// Patch list in effect
    pub fn patches(&self) -> Vec<SourcePatch> {
        self.patches.clone().unwrap_or_else(SourcePatch::builtin)
    }

    /// Compile database path for a tree rooted at `root`
    pub fn compile_db_path(&self, root: &Path) -> PathBuf {
        root.join(&self.project.build_dir).join(&self.project.compile_db)
    }

    /// Secondary tree location for a primary tree at `root`
    pub fn secondary_tree(&self, root: &Path) -> PathBuf {
        match &self.project.secondary_tree {
            Some(path) => normalize_lexically(&root.join(path)),
            None => {
                let name = root
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "project".to_string());
                normalize_lexically(&root.join("..").join(format!("{}-compart", name)))
            }
        }
    }

    /// Check invariants that `serde` cannot express.
    ///
    /// Key 0 is reserved, keys are unique, entry files are plain relative
    /// paths inside their directory.
    pub fn validate(&self, file: &Path) -> CompartResult<()> {
        let mut seen: BTreeMap<CompartmentKey, &str> = BTreeMap::new();
        for (name, compartment) in &self.compartments {
            if compartment.key.is_reserved() {
                return Err(CompartError::ReservedKey {
                    compartment: name.clone(),
                });
            }
            if let Some(first) = seen.insert(compartment.key, name) {
                return Err(CompartError::DuplicateKey {
                    key: compartment.key.get(),
                    first: first.to_string(),
                    second: name.clone(),
                });
            }
            if name.is_empty() || name.contains('/') || name.contains('\\') {
                return Err(CompartError::ConfigInvalid {
                    file: file.to_path_buf(),
                    message: format!(
                        "compartment directory '{}' must be a single top-level name",
                        name
                    ),
                });
            }
            if compartment.entry.as_os_str().is_empty()
                || compartment.entry.is_absolute()
                || compartment
                    .entry
                    .components()
                    .any(|c| matches!(c, Component::ParentDir))
            {
                return Err(CompartError::ConfigInvalid {
                    file: file.to_path_buf(),
                    message: format!(
                        "entry '{}' of compartment '{}' must be relative to its directory",
                        compartment.entry.display(),
                        name
                    ),
                });
            }
        }
        if self.rewriter.debugger.is_empty() {
            return Err(CompartError::ConfigInvalid {
                file: file.to_path_buf(),
                message: "rewriter.debugger must name a launcher program".to_string(),
            });
        }
        if self.build.configure.is_empty() || self.build.build.is_empty() {
            return Err(CompartError::ConfigInvalid {
                file: file.to_path_buf(),
                message: "build.configure and build.build must not be empty".to_string(),
            });
        }
        let stage = &self.project.stage_dir;
        let below_root = stage
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
            && stage.components().any(|c| matches!(c, Component::Normal(_)));
        if !below_root {
            return Err(CompartError::ConfigInvalid {
                file: file.to_path_buf(),
                message: format!(
                    "project.stage_dir '{}' must be a directory below the project root",
                    stage.display()
                ),
            });
        }
        Ok(())
    }
}
