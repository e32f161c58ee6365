//! Inject command handler

use anyhow::Result;

use compart::application::InjectReport;
use compart::Tree;

use super::context::CommandContext;

pub fn cmd_inject(ctx: &CommandContext, tree: Tree, dry_run: bool) -> Result<()> {
    let report = ctx.with_pipeline("inject", |pipeline| {
        let partition = pipeline.partition()?;
        pipeline.inject(&partition, tree, dry_run)
    })?;

    if ctx.json {
        crate::ui::json::emit_data(
            "inject",
            serde_json::json!({
                "dry_run": dry_run,
                "files": report_json(&report),
            }),
        )?;
        return Ok(());
    }

    if dry_run {
        for file in &report.files {
            crate::ui::output::print_diff(file.diff.as_deref());
        }
        println!("{} entry files would change", report.written());
    } else {
        println!("{} entry files updated", report.written());
    }
    Ok(())
}

fn report_json(report: &InjectReport) -> Vec<serde_json::Value> {
    report
        .files
        .iter()
        .map(|f| {
            serde_json::json!({
                "path": f.path.display().to_string(),
                "key": f.key.get(),
                "binary": f.is_binary,
                "change": f.change.as_str(),
                "diff": f.diff,
            })
        })
        .collect()
}
