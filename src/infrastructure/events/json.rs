//! JSON Event Sink
//!
//! Outputs pipeline events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use crate::domain::ports::{EventSink, PipelineEvent};

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    writer: Mutex<Box<dyn Write + Send>>,
    command: &'static str,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(command: &'static str) -> Self {
        Self::with_writer(command, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(command: &'static str, writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            command,
        }
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }
}

impl EventSink for JsonEventSink {
    fn on_event(&self, event: PipelineEvent) {
        let json = match event {
            PipelineEvent::StageStarted { stage } => serde_json::json!({
                "event": "stage",
                "command": self.command,
                "stage": stage.as_str(),
            }),
            PipelineEvent::StageSkipped { stage, reason } => serde_json::json!({
                "event": "stage_skipped",
                "command": self.command,
                "stage": stage.as_str(),
                "reason": reason,
            }),
            PipelineEvent::Partitioned {
                compartments,
                unassigned,
            } => serde_json::json!({
                "event": "partitioned",
                "command": self.command,
                "compartments": compartments
                    .iter()
                    .map(|(key, name, members)| serde_json::json!({
                        "key": key.get(),
                        "name": name,
                        "members": members,
                    }))
                    .collect::<Vec<_>>(),
                "unassigned": unassigned,
            }),
            PipelineEvent::FileTouched {
                stage,
                path,
                change,
            } => serde_json::json!({
                "event": "file",
                "command": self.command,
                "stage": stage.as_str(),
                "path": path.display().to_string(),
                "change": change.as_str(),
            }),
            PipelineEvent::Merged { copied, discarded } => serde_json::json!({
                "event": "merged",
                "command": self.command,
                "copied": copied,
                "discarded": discarded,
            }),
            PipelineEvent::Produced { stage, path } => serde_json::json!({
                "event": "produced",
                "command": self.command,
                "stage": stage.as_str(),
                "path": path.display().to_string(),
            }),
            PipelineEvent::Completed { secondary } => serde_json::json!({
                "event": "complete",
                "command": self.command,
                "secondary": secondary.display().to_string(),
            }),
        };
        self.write_event(json);
    }
}
