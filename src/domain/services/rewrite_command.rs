//! Rewriter command-line construction
//!
//! Pure: takes resolved locations and a partition, returns the invocations a
//! run would make. Execution lives in the application layer.

use std::path::{Path, PathBuf};

use crate::config::RewriterConfig;
use crate::domain::ports::ToolCommand;
use crate::domain::services::assigner::Partition;
use crate::domain::value_objects::{CompartmentKey, RewriteMode};

/// Absolute locations the rewriter needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteLayout {
    pub binary: PathBuf,
    /// Primary tree; also passed as `--root-directory`
    pub root: PathBuf,
    /// `<secondary>/<callgate_dir>/<prefix>`
    pub output_prefix: PathBuf,
    /// Staging tree receiving rewritten sources
    pub stage_dir: PathBuf,
    /// Directory holding `compile_commands.json`
    pub compile_db_dir: PathBuf,
    /// `<llvm libdir>/clang/<version>/include`
    pub resource_include: PathBuf,
    pub runtime_include: PathBuf,
}

/// What one invocation covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteScope {
    Compartment(CompartmentKey),
    Unified,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteInvocation {
    pub scope: RewriteScope,
    pub command: ToolCommand,
}

/// Build the invocations for `mode`, per compartment in ascending key order
/// or a single one over the union of members.
pub fn plan_invocations(
    partition: &Partition,
    layout: &RewriteLayout,
    config: &RewriterConfig,
    mode: RewriteMode,
) -> Vec<RewriteInvocation> {
    match mode {
        RewriteMode::PerCompartment => partition
            .compartments
            .iter()
            .map(|compartment| RewriteInvocation {
                scope: RewriteScope::Compartment(compartment.key),
                command: rewrite_command(
                    layout,
                    config,
                    Some(compartment.key),
                    &compartment.absolute_members(&layout.root),
                ),
            })
            .collect(),
        RewriteMode::Unified => {
            let mut files: Vec<PathBuf> = partition
                .compartments
                .iter()
                .flat_map(|c| c.absolute_members(&layout.root))
                .collect();
            files.sort();
            files.dedup();
            if files.is_empty() {
                return Vec::new();
            }
            vec![RewriteInvocation {
                scope: RewriteScope::Unified,
                command: rewrite_command(layout, config, None, &files),
            }]
        }
    }
}

/// One rewriter command line.
///
/// `pkey` adds `-DPKEY=<key>`; unified runs leave it out and rely on the
/// injected `IA2_COMPARTMENT` define instead.
pub fn rewrite_command(
    layout: &RewriteLayout,
    config: &RewriterConfig,
    pkey: Option<CompartmentKey>,
    files: &[PathBuf],
) -> ToolCommand {
    let mut command = ToolCommand::new(&layout.binary)
        .arg("--output-prefix")
        .arg(&layout.output_prefix)
        .arg("--root-directory")
        .arg(&layout.root)
        .arg("--output-directory")
        .arg(&layout.stage_dir)
        .arg("-p")
        .arg(&layout.compile_db_dir);

    for extra in extra_args(layout, config, pkey) {
        command = command.arg("--extra-arg").arg(extra);
    }

    command.args(files).current_dir(&layout.root)
}

fn extra_args(
    layout: &RewriteLayout,
    config: &RewriterConfig,
    pkey: Option<CompartmentKey>,
) -> Vec<String> {
    let mut args = Vec::new();
    for dir in &config.fixed_includes {
        args.push("-isystem".to_string());
        args.push(dir.clone());
    }
    args.push("-isystem".to_string());
    args.push(display(&layout.resource_include));
    if let Some(key) = pkey {
        args.push(format!("-DPKEY={}", key));
    }
    args.push(format!("-I{}", display(&layout.runtime_include)));
    args.push(format!("-std={}", config.std));
    args.extend(config.warning_suppressions.iter().cloned());
    args.extend(config.extra_args.iter().cloned());
    args
}

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Compartment;
    use std::ffi::OsString;

    fn layout() -> RewriteLayout {
        RewriteLayout {
            binary: PathBuf::from("/opt/ia2/ia2-rewriter"),
            root: PathBuf::from("/w/dav1d"),
            output_prefix: PathBuf::from("/w/dav1d-compart/ia2/callgate_wrapper"),
            stage_dir: PathBuf::from("/w/dav1d/build/compart-rewritten"),
            compile_db_dir: PathBuf::from("/w/dav1d/build"),
            resource_include: PathBuf::from("/usr/lib/llvm-18/lib/clang/18/include"),
            runtime_include: PathBuf::from("/opt/ia2/include"),
        }
    }

    fn partition() -> Partition {
        let mut tools = Compartment::new(CompartmentKey::new(1), "tools", "tools/dav1d.c");
        tools.members.insert(PathBuf::from("tools/dav1d.c"));
        let mut src = Compartment::new(CompartmentKey::new(2), "src", "src/lib.c");
        src.members.insert(PathBuf::from("src/lib.c"));
        src.members.insert(PathBuf::from("src/data.c"));
        Partition {
            compartments: vec![tools, src],
            unassigned: vec![PathBuf::from("tests/seek_stress.c")],
        }
    }

    fn strings(command: &ToolCommand) -> Vec<String> {
        command
            .args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn per_compartment_invocation_scopes_files() {
        let invocations = plan_invocations(
            &partition(),
            &layout(),
            &RewriterConfig::default(),
            RewriteMode::PerCompartment,
        );
        assert_eq!(invocations.len(), 2);
        assert_eq!(invocations[0].scope, RewriteScope::Compartment(CompartmentKey::new(1)));

        let src = &invocations[1].command;
        assert_eq!(src.count_arg("-DPKEY=2"), 1);
        assert_eq!(src.count_arg("/w/dav1d/src/lib.c"), 1);
        assert_eq!(src.count_arg("/w/dav1d/src/data.c"), 1);
        assert_eq!(src.count_arg("/w/dav1d/tools/dav1d.c"), 0);
        assert_eq!(src.count_arg("/w/dav1d/tests/seek_stress.c"), 0);
        assert_eq!(src.count_arg("-DPKEY=1"), 0);
    }

    #[test]
    fn argument_order() {
        let command = rewrite_command(
            &layout(),
            &RewriterConfig::default(),
            Some(CompartmentKey::new(2)),
            &[PathBuf::from("/w/dav1d/src/lib.c")],
        );
        let args = strings(&command);
        assert_eq!(
            &args[..8],
            &[
                "--output-prefix",
                "/w/dav1d-compart/ia2/callgate_wrapper",
                "--root-directory",
                "/w/dav1d",
                "--output-directory",
                "/w/dav1d/build/compart-rewritten",
                "-p",
                "/w/dav1d/build",
            ]
        );
        let extras: Vec<&str> = args[8..]
            .chunks(2)
            .filter(|pair| pair.len() == 2 && pair[0] == "--extra-arg")
            .map(|pair| pair[1].as_str())
            .collect();
        assert_eq!(
            extras,
            vec![
                "-isystem",
                "include-fixed",
                "-isystem",
                "/usr/lib/llvm-18/lib/clang/18/include",
                "-DPKEY=2",
                "-I/opt/ia2/include",
                "-std=gnu11",
                "-Wno-error=missing-prototypes",
                "-Wno-missing-prototypes",
                "-Wno-undef",
                "-Wno-strict-prototypes",
                "-Wno-unknown-warning-option",
                "-Wno-macro-redefined",
            ]
        );
        assert_eq!(args.last().map(String::as_str), Some("/w/dav1d/src/lib.c"));
        assert_eq!(command.cwd, Some(PathBuf::from("/w/dav1d")));
    }

    #[test]
    fn unified_has_union_and_no_pkey() {
        let invocations = plan_invocations(
            &partition(),
            &layout(),
            &RewriterConfig::default(),
            RewriteMode::Unified,
        );
        assert_eq!(invocations.len(), 1);
        let command = &invocations[0].command;
        assert!(strings(command).iter().all(|a| !a.starts_with("-DPKEY")));
        for file in ["src/data.c", "src/lib.c", "tools/dav1d.c"] {
            assert_eq!(command.count_arg(OsString::from(format!("/w/dav1d/{}", file))), 1);
        }
    }

    #[test]
    fn extra_args_come_last() {
        let config = RewriterConfig {
            extra_args: vec!["-DNDEBUG".to_string()],
            ..RewriterConfig::default()
        };
        let command = rewrite_command(&layout(), &config, None, &[]);
        let args = strings(&command);
        assert_eq!(&args[args.len() - 2..], &["--extra-arg", "-DNDEBUG"]);
    }
}
