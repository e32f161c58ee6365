//! Command handlers

mod assign;
mod canonicalize;
mod context;
mod inject;
mod patch;
mod project_root;
mod rewrite;
mod run;
mod sync;

use anyhow::Result;

use compart::{Interrupt, RunOptions};

use crate::cli::{Cli, Commands};
use context::CommandContext;

pub fn dispatch(cli: Cli, interrupt: Interrupt) -> Result<()> {
    let mut ctx = CommandContext::load(
        cli.root.as_deref(),
        cli.config.as_deref(),
        cli.json,
        interrupt,
    )?;

    match cli.command {
        Commands::Run {
            mode,
            on_failure,
            skip_bootstrap,
            skip_sync,
        } => {
            ctx.override_rewriter(mode, on_failure);
            run::cmd_run(
                &ctx,
                RunOptions {
                    skip_bootstrap,
                    skip_sync,
                },
            )
        }
        Commands::Assign => assign::cmd_assign(&ctx),
        Commands::Inject { dry_run, tree } => inject::cmd_inject(&ctx, tree.into(), dry_run),
        Commands::Rewrite { mode, on_failure } => {
            ctx.override_rewriter(mode, on_failure);
            rewrite::cmd_rewrite(&ctx)
        }
        Commands::Patch { dry_run } => patch::cmd_patch(&ctx, dry_run),
        Commands::Sync => sync::cmd_sync(&ctx),
        Commands::Canonicalize => canonicalize::cmd_canonicalize(&ctx),
    }
}
