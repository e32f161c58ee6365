//! Patch command handler

use anyhow::Result;

use super::context::CommandContext;

pub fn cmd_patch(ctx: &CommandContext, dry_run: bool) -> Result<()> {
    let report = ctx.with_pipeline("patch", |pipeline| pipeline.patch(dry_run))?;

    if ctx.json {
        let entries: Vec<_> = report
            .entries
            .iter()
            .map(|e| {
                serde_json::json!({
                    "file": e.file.display().to_string(),
                    "reason": e.reason,
                    "change": e.change.as_str(),
                    "diff": e.diff,
                })
            })
            .collect();
        crate::ui::json::emit_data(
            "patch",
            serde_json::json!({ "dry_run": dry_run, "patches": entries }),
        )?;
        return Ok(());
    }

    if dry_run {
        for entry in &report.entries {
            crate::ui::output::print_diff(entry.diff.as_deref());
        }
        println!("{} patches would apply", report.applied());
    } else {
        println!(
            "{} patches applied, {} already present",
            report.applied(),
            report.entries.len() - report.applied()
        );
    }
    Ok(())
}
