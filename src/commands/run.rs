//! Run command handler

use anyhow::Result;

use compart::RunOptions;

use super::context::CommandContext;

pub fn cmd_run(ctx: &CommandContext, options: RunOptions) -> Result<()> {
    tracing::info!(
        mode = %ctx.config.rewriter.mode,
        on_failure = %ctx.config.rewriter.on_failure,
        "starting pipeline"
    );
    let report = ctx.with_pipeline("run", |pipeline| pipeline.run(options))?;

    if ctx.json {
        crate::ui::json::emit_data(
            "run",
            serde_json::json!({
                "compartments": report.partition.total(),
                "unassigned": report.partition.unassigned.len(),
                "rewrites": report.rewrites,
                "merged": report.merge.copied.len(),
                "primary_injected": report.primary_injection.written(),
                "secondary_injected": report.secondary_injection.written(),
                "patches_applied": report.patches.applied(),
                "callgate_library": report.callgate_library.display().to_string(),
            }),
        )?;
        return Ok(());
    }

    println!(
        "{} compartments, {} rewriter invocations, {} files merged, {} patches applied",
        report.partition.total(),
        report.rewrites,
        report.merge.copied.len(),
        report.patches.applied()
    );
    crate::ui::output::print_summary("call gates", &report.callgate_library);
    Ok(())
}
