//! Configuration loading and layering

use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::value_objects::{ConfigWarning, FailurePolicy, RewriteMode};
use crate::error::{CompartError, CompartResult};

use super::types::Config;

/// Load configuration and collect non-fatal warnings (e.g. unknown keys).
pub fn load_with_warnings(path: &Path) -> CompartResult<(Config, Vec<ConfigWarning>)> {
    let content = fs::read_to_string(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = toml::de::Deserializer::new(&content);

    let config: Config = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| CompartError::ConfigInvalid {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    config.validate(path)?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                key: path_str.clone(),
                file: path.to_path_buf(),
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
            }
        })
        .collect();

    Ok((config, warnings))
}

/// Resolve the configuration for a project.
///
/// An explicit path must exist. Otherwise `<root>/compart.toml` is used when
/// present, falling back to built-in defaults. Environment overrides apply
/// last in every case.
pub fn load_for_project(
    root: &Path,
    explicit: Option<&Path>,
) -> CompartResult<(Config, Vec<ConfigWarning>, Option<PathBuf>)> {
    let candidate = match explicit {
        Some(path) => {
            let path = root.join(path);
            if !path.exists() {
                return Err(CompartError::ConfigInvalid {
                    file: path,
                    message: "file not found".to_string(),
                });
            }
            Some(path)
        }
        None => {
            let path = root.join(Config::FILE_NAME);
            path.exists().then_some(path)
        }
    };

    let (config, warnings) = match &candidate {
        Some(path) => load_with_warnings(path)?,
        None => (Config::default(), Vec::new()),
    };

    let config = with_env_overrides(config)?;
    Ok((config, warnings, candidate))
}

/// Apply environment variable overrides (COMPART_* prefix)
pub fn with_env_overrides(mut config: Config) -> CompartResult<Config> {
    let env_file = PathBuf::from("<environment>");

    // COMPART_REWRITE_MODE
    if let Ok(mode) = std::env::var("COMPART_REWRITE_MODE") {
        config.rewriter.mode = mode
            .parse::<RewriteMode>()
            .map_err(|message| CompartError::ConfigInvalid {
                file: env_file.clone(),
                message,
            })?;
    }

    // COMPART_ON_FAILURE
    if let Ok(policy) = std::env::var("COMPART_ON_FAILURE") {
        config.rewriter.on_failure = policy
            .parse::<FailurePolicy>()
            .map_err(|message| CompartError::ConfigInvalid {
                file: env_file.clone(),
                message,
            })?;
    }

    // COMPART_REWRITER
    if let Ok(binary) = std::env::var("COMPART_REWRITER") {
        if !binary.is_empty() {
            config.rewriter.binary = PathBuf::from(binary);
        }
    }

    // COMPART_SECONDARY_TREE
    if let Ok(tree) = std::env::var("COMPART_SECONDARY_TREE") {
        if !tree.is_empty() {
            config.project.secondary_tree = Some(PathBuf::from(tree));
        }
    }

    Ok(config)
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &[
        "project",
        "build_dir",
        "compile_db",
        "secondary_tree",
        "stage_dir",
        "compartments",
        "key",
        "entry",
        "exclude",
        "preamble",
        "guard",
        "runtime_header",
        "init_include",
        "entry_marker",
        "rewriter",
        "binary",
        "runtime_include",
        "callgate_dir",
        "output_prefix",
        "mode",
        "on_failure",
        "debugger",
        "std",
        "warning_suppressions",
        "fixed_includes",
        "extra_args",
        "toolchain",
        "llvm_config",
        "clang_version",
        "resource_include",
        "build",
        "configure",
        "reconfigure_flag",
        "targets",
        "compartment_options",
        "cc",
        "callgate_flags",
        "callgate_library",
        "sync",
        "git",
        "keep",
        "files",
        "dirs",
        "patches",
        "file",
        "find",
        "replace",
        "reason",
    ];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 2 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] =
                std::cmp::min(std::cmp::min(prev[j + 1] + 1, curr[j] + 1), prev[j] + cost);
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
