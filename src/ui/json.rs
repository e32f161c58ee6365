use std::io::{self, Write};

/// Write a single NDJSON event (one JSON object per line).
pub fn write_event(out: &mut impl Write, event: &serde_json::Value) -> io::Result<()> {
    serde_json::to_writer(&mut *out, event)?;
    out.write_all(b"\n")?;
    out.flush()
}

/// Write an event to stdout.
pub fn emit(event: serde_json::Value) -> io::Result<()> {
    let mut out = io::stdout().lock();
    write_event(&mut out, &event)
}

/// Final `data` event of a command; `fields` must be a JSON object.
pub fn emit_data(command: &str, fields: serde_json::Value) -> io::Result<()> {
    let mut event = serde_json::json!({
        "event": "data",
        "command": command,
    });
    if let (Some(target), serde_json::Value::Object(extra)) = (event.as_object_mut(), fields) {
        target.extend(extra);
    }
    emit(event)
}
