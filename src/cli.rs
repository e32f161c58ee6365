use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use compart::{FailurePolicy, RewriteMode, Tree};

/// compart - partition a C codebase into hardware-isolated compartments
#[derive(Parser, Debug)]
#[command(name = "compart")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Emit NDJSON events instead of human output
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Configuration file (default: <root>/compart.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Primary tree root (default: discovered from the current directory)
    #[arg(long, global = true)]
    pub root: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the whole pipeline: bootstrap, rewrite, patch, build
    Run {
        /// Rewriter invocation mode
        #[arg(long)]
        mode: Option<RewriteMode>,

        /// What to do when the rewriter fails
        #[arg(long)]
        on_failure: Option<FailurePolicy>,

        /// Reuse the existing primary build and compile database
        #[arg(long)]
        skip_bootstrap: bool,

        /// Do not clone or pull the secondary tree
        #[arg(long)]
        skip_sync: bool,
    },

    /// Show which compartment each source belongs to (no changes)
    Assign,

    /// Inject compartment preambles into entry files
    Inject {
        /// Show the diff without writing
        #[arg(long)]
        dry_run: bool,

        /// Tree to inject into
        #[arg(long, value_enum, default_value_t = TreeArg::Primary)]
        tree: TreeArg,
    },

    /// Run the rewriter and merge its kept output into the secondary tree
    Rewrite {
        #[arg(long)]
        mode: Option<RewriteMode>,

        #[arg(long)]
        on_failure: Option<FailurePolicy>,
    },

    /// Apply source patches to the secondary tree
    Patch {
        /// Show the diff without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Clone or update the secondary tree
    Sync,

    /// Make compile database paths absolute and normalized, in place
    Canonicalize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TreeArg {
    Primary,
    Secondary,
}

impl From<TreeArg> for Tree {
    fn from(arg: TreeArg) -> Self {
        match arg {
            TreeArg::Primary => Tree::Primary,
            TreeArg::Secondary => Tree::Secondary,
        }
    }
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Run { .. } => "run",
            Commands::Assign => "assign",
            Commands::Inject { .. } => "inject",
            Commands::Rewrite { .. } => "rewrite",
            Commands::Patch { .. } => "patch",
            Commands::Sync => "sync",
            Commands::Canonicalize => "canonicalize",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_flags_parse() {
        let cli = Cli::try_parse_from([
            "compart",
            "-vv",
            "run",
            "--mode",
            "unified",
            "--on-failure",
            "inspect",
            "--skip-sync",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Run {
                mode,
                on_failure,
                skip_bootstrap,
                skip_sync,
            } => {
                assert_eq!(mode, Some(RewriteMode::Unified));
                assert_eq!(on_failure, Some(FailurePolicy::Inspect));
                assert!(!skip_bootstrap);
                assert!(skip_sync);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn bad_mode_is_rejected() {
        assert!(Cli::try_parse_from(["compart", "run", "--mode", "sideways"]).is_err());
    }

    #[test]
    fn inject_defaults_to_primary() {
        let cli = Cli::try_parse_from(["compart", "inject", "--dry-run"]).unwrap();
        match cli.command {
            Commands::Inject { dry_run, tree } => {
                assert!(dry_run);
                assert_eq!(tree, TreeArg::Primary);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["compart", "assign", "--json", "--root", "/w/dav1d"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.root, Some(PathBuf::from("/w/dav1d")));
    }
}
