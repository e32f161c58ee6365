use compart::CompartError;

pub fn format_error(err: &anyhow::Error) -> String {
    match err.downcast_ref::<CompartError>() {
        Some(compart) => format_compart_error(compart),
        None => format!("[ERROR] {:#}\n", err),
    }
}

fn format_compart_error(err: &CompartError) -> String {
    let mut out = format!("[ERROR] {}: {}\n", err.category().as_str(), err);
    if let Some(hint) = hint(err) {
        out.push_str(&format!("  hint: {}\n", hint));
    }
    out
}

fn hint(err: &CompartError) -> Option<&'static str> {
    match err {
        CompartError::CompileDbMissing { .. } => {
            Some("build the primary tree first, or drop --skip-bootstrap")
        }
        CompartError::EntryFileMissing { .. } => {
            Some("set `entry` for the compartment in compart.toml to a file in the compile database")
        }
        CompartError::PatchMismatch { .. } => {
            Some("the source changed upstream; update or remove the patch in compart.toml")
        }
        CompartError::SyncConflict { .. } => {
            Some("fix the secondary tree with git, then rerun with --skip-sync")
        }
        CompartError::ToolFailed { .. } => {
            Some("rerun with -v to see each command line, or --on-failure inspect")
        }
        CompartError::ToolSpawn { .. } => Some("check the tool paths in compart.toml"),
        _ => None,
    }
}

pub fn print_error(err: &anyhow::Error, json: bool, command: &str) {
    if json {
        let category = err
            .downcast_ref::<CompartError>()
            .map(|e| e.category().as_str())
            .unwrap_or("runtime");
        let output = serde_json::json!({
            "event": "error",
            "command": command,
            "category": category,
            "message": err.to_string(),
            "exit_code": exit_code(err),
        });
        let _ = crate::ui::json::emit(output);
        return;
    }

    eprint!("{}", format_error(err));
}

/// Exit code for a failed command
pub fn exit_code(err: &anyhow::Error) -> i32 {
    err.downcast_ref::<CompartError>()
        .map(CompartError::exit_code)
        .unwrap_or(1)
}
