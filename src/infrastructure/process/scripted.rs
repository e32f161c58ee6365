//! Scripted command runner for tests
//!
//! Records every command and answers with exit codes (and captured stdout)
//! chosen by the test. Unscripted commands succeed with empty output.

use std::sync::{Arc, Mutex};

use crate::domain::ports::{CommandRunner, ToolCommand, ToolStatus};
use crate::error::CompartResult;

#[derive(Debug, Clone)]
struct Rule {
    /// Matches when the program's file name equals this, or when the full
    /// rendered command line contains it
    needle: String,
    code: i32,
    stdout: String,
    remaining: Option<usize>,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    rules: Arc<Mutex<Vec<Rule>>>,
    calls: Arc<Mutex<Vec<ToolCommand>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands matching `needle` exit with `code`
    pub fn fail(self, needle: &str, code: i32) -> Self {
        self.push(Rule {
            needle: needle.to_string(),
            code,
            stdout: String::new(),
            remaining: None,
        })
    }

    /// The next matching command only exits with `code`
    pub fn fail_once(self, needle: &str, code: i32) -> Self {
        self.push(Rule {
            needle: needle.to_string(),
            code,
            stdout: String::new(),
            remaining: Some(1),
        })
    }

    /// Commands matching `needle` succeed and print `stdout`
    pub fn output(self, needle: &str, stdout: &str) -> Self {
        self.push(Rule {
            needle: needle.to_string(),
            code: 0,
            stdout: stdout.to_string(),
            remaining: None,
        })
    }

    fn push(self, rule: Rule) -> Self {
        if let Ok(mut rules) = self.rules.lock() {
            rules.push(rule);
        }
        self
    }

    /// Every command seen, in order
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Rendered command lines, without the `> ` prompt
    pub fn lines(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.to_string().trim_start_matches("> ").to_string())
            .collect()
    }

    fn answer(&self, command: &ToolCommand) -> (ToolStatus, String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(command.clone());
        }
        let line = command.to_string();
        let name = command.name();
        let Ok(mut rules) = self.rules.lock() else {
            return (ToolStatus::SUCCESS, String::new());
        };
        for rule in rules.iter_mut() {
            if rule.remaining == Some(0) {
                continue;
            }
            if name == rule.needle || line.contains(&rule.needle) {
                if let Some(left) = rule.remaining.as_mut() {
                    *left -= 1;
                }
                return (ToolStatus::exited(rule.code), rule.stdout.clone());
            }
        }
        (ToolStatus::SUCCESS, String::new())
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &ToolCommand) -> CompartResult<ToolStatus> {
        Ok(self.answer(command).0)
    }

    fn capture(&self, command: &ToolCommand) -> CompartResult<(ToolStatus, String)> {
        Ok(self.answer(command))
    }
}
