//! Sync command handler

use anyhow::Result;

use super::context::CommandContext;

pub fn cmd_sync(ctx: &CommandContext) -> Result<()> {
    let (report, secondary) =
        ctx.with_pipeline("sync", |pipeline| Ok((pipeline.sync()?, pipeline.paths().secondary.clone())))?;

    if ctx.json {
        crate::ui::json::emit_data(
            "sync",
            serde_json::json!({
                "secondary": secondary.display().to_string(),
                "cloned": report.cloned,
                "stashed": report.stashed,
            }),
        )?;
        return Ok(());
    }

    let action = if report.cloned { "cloned" } else { "updated" };
    crate::ui::output::print_summary(action, &secondary);
    Ok(())
}
