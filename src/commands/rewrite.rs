//! Rewrite command handler

use anyhow::Result;

use super::context::CommandContext;

pub fn cmd_rewrite(ctx: &CommandContext) -> Result<()> {
    let (invocations, merge) = ctx.with_pipeline("rewrite", |pipeline| {
        let partition = pipeline.partition()?;
        let invocations = pipeline.rewrite(&partition)?;
        Ok((invocations, pipeline.merge()?))
    })?;

    if ctx.json {
        crate::ui::json::emit_data(
            "rewrite",
            serde_json::json!({
                "mode": ctx.config.rewriter.mode.to_string(),
                "invocations": invocations,
                "copied": merge.copied.iter().map(|p| p.display().to_string()).collect::<Vec<_>>(),
                "discarded": merge.discarded.len(),
            }),
        )?;
        return Ok(());
    }

    println!(
        "{} rewriter invocations ({}), {} files merged",
        invocations,
        ctx.config.rewriter.mode,
        merge.copied.len()
    );
    Ok(())
}
