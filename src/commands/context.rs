//! Shared command setup: root discovery, configuration, ports

use std::path::{Path, PathBuf};

use anyhow::Result;

use compart::config::load_for_project;
use compart::domain::ports::EventSink;
use compart::domain::value_objects::normalize_lexically;
use compart::infrastructure::{handler_for, ConsoleEventSink, JsonEventSink, LocalFs, SystemRunner};
use compart::{CompartResult, Config, FailurePolicy, Interrupt, Pipeline, RewriteMode};

use super::project_root::discover_project_root;

pub struct CommandContext {
    pub root: PathBuf,
    pub config: Config,
    pub json: bool,
    pub interrupt: Interrupt,
}

impl CommandContext {
    pub fn load(
        root: Option<&Path>,
        config: Option<&Path>,
        json: bool,
        interrupt: Interrupt,
    ) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let root = match root {
            Some(root) => normalize_lexically(&cwd.join(root)),
            None => discover_project_root(&cwd),
        };
        // --config is relative to the invocation directory, not the root
        let explicit = config.map(|path| cwd.join(path));

        let (config, warnings, config_file) = load_for_project(&root, explicit.as_deref())?;
        crate::ui::output::print_config_warnings(&warnings);
        tracing::debug!(
            root = %root.display(),
            config = ?config_file,
            "loaded configuration"
        );

        Ok(Self {
            root,
            config,
            json,
            interrupt,
        })
    }

    /// Apply rewriter flags over the loaded configuration.
    pub fn override_rewriter(&mut self, mode: Option<RewriteMode>, on_failure: Option<FailurePolicy>) {
        if let Some(mode) = mode {
            self.config.rewriter.mode = mode;
        }
        if let Some(policy) = on_failure {
            self.config.rewriter.on_failure = policy;
        }
    }

    pub fn event_sink(&self, command: &'static str) -> Box<dyn EventSink> {
        if self.json {
            Box::new(JsonEventSink::stdout(command))
        } else {
            Box::new(ConsoleEventSink)
        }
    }
}

impl CommandContext {
    /// Run `f` against a pipeline wired to the local disk and real processes.
    pub fn with_pipeline<T>(
        &self,
        command: &'static str,
        f: impl FnOnce(&Pipeline<'_>) -> CompartResult<T>,
    ) -> Result<T> {
        let fs = LocalFs::new();
        let runner = SystemRunner::new(self.json);
        let failure = handler_for(self.config.rewriter.on_failure, &self.config.rewriter.debugger);
        let events = self.event_sink(command);
        let pipeline = Pipeline::new(
            &self.config,
            &self.root,
            &fs,
            &runner,
            failure.as_ref(),
            events.as_ref(),
        )
        .with_interrupt(self.interrupt.clone());
        Ok(f(&pipeline)?)
    }
}
