//! Console Event Sink
//!
//! Short human progress lines on stdout.

use crate::domain::ports::{EventSink, FileChange, PipelineEvent};

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEventSink;

impl EventSink for ConsoleEventSink {
    fn on_event(&self, event: PipelineEvent) {
        match event {
            PipelineEvent::StageStarted { stage } => println!("==> {}", stage),
            PipelineEvent::StageSkipped { stage, reason } => {
                println!("==> {} (skipped: {})", stage, reason)
            }
            PipelineEvent::Partitioned {
                compartments,
                unassigned,
            } => {
                for (key, name, members) in compartments {
                    println!("    compartment {} {:<8} {} sources", key, name, members);
                }
                if unassigned > 0 {
                    println!("    {} sources stay in the untrusted compartment", unassigned);
                }
            }
            PipelineEvent::FileTouched { path, change, .. } => {
                if change != FileChange::Unchanged {
                    println!("    {:<15} {}", change.as_str(), path.display());
                }
            }
            PipelineEvent::Merged { copied, discarded } => {
                println!("    kept {} files, dropped {}", copied, discarded)
            }
            PipelineEvent::Produced { path, .. } => println!("    built {}", path.display()),
            PipelineEvent::Completed { secondary } => {
                println!("Done. Compartmentalized tree: {}", secondary.display())
            }
        }
    }
}
