//! Assign command handler

use anyhow::Result;

use compart::application::read_sources;
use compart::infrastructure::LocalFs;
use compart::{partition, PipelineRun};

pub fn cmd_assign(ctx: &super::context::CommandContext) -> Result<()> {
    let paths = PipelineRun::resolve(&ctx.config, &ctx.root);
    let sources = read_sources(&LocalFs::new(), &paths.compile_db, &ctx.root)?;
    let partition = partition(&sources, &ctx.config.compartments)?;

    if ctx.json {
        let compartments: Vec<_> = partition
            .compartments
            .iter()
            .map(|c| {
                serde_json::json!({
                    "key": c.key.get(),
                    "name": c.name,
                    "entry": c.entry_file.display().to_string(),
                    "members": c.members.iter().map(|m| m.display().to_string()).collect::<Vec<_>>(),
                })
            })
            .collect();
        crate::ui::json::emit_data(
            "assign",
            serde_json::json!({
                "root": ctx.root.display().to_string(),
                "compartments": compartments,
                "unassigned": partition
                    .unassigned
                    .iter()
                    .map(|p| p.display().to_string())
                    .collect::<Vec<_>>(),
            }),
        )?;
        return Ok(());
    }

    print!("{}", crate::ui::output::render_partition(&partition));
    Ok(())
}
