//! Canonicalize command handler

use anyhow::Result;

use super::context::CommandContext;

pub fn cmd_canonicalize(ctx: &CommandContext) -> Result<()> {
    let (result, db) = ctx.with_pipeline("canonicalize", |pipeline| {
        Ok((pipeline.canonicalize()?, pipeline.paths().compile_db.clone()))
    })?;

    if ctx.json {
        crate::ui::json::emit_data(
            "canonicalize",
            serde_json::json!({
                "compile_db": db.display().to_string(),
                "records": result.records,
                "rewritten": result.rewritten,
            }),
        )?;
        return Ok(());
    }

    println!(
        "{}: {} records, {} rewritten",
        db.display(),
        result.records,
        result.rewritten
    );
    Ok(())
}
