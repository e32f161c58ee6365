//! Test environment for driving the compart binary.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Result of running a compart CLI command
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Parse stdout as NDJSON
    pub fn events(&self) -> Vec<serde_json::Value> {
        self.stdout
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| serde_json::from_str(l).unwrap_or_else(|e| panic!("bad NDJSON line {:?}: {}", l, e)))
            .collect()
    }
}

/// Isolated primary tree and secondary tree, each in its own temp dir.
pub struct TestEnv {
    pub primary: TempDir,
    pub secondary: TempDir,
    bin: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            primary: TempDir::new().expect("create primary tree"),
            secondary: TempDir::new().expect("create secondary tree"),
            bin: PathBuf::from(env!("CARGO_BIN_EXE_compart")),
        }
    }

    pub fn primary_path(&self, relative: &str) -> PathBuf {
        self.primary.path().join(relative)
    }

    pub fn secondary_path(&self, relative: &str) -> PathBuf {
        self.secondary.path().join(relative)
    }

    /// Run compart from the primary root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_from(self.primary.path(), args)
    }

    pub fn run_from(&self, cwd: &Path, args: &[&str]) -> TestResult {
        let output = Command::new(&self.bin)
            .current_dir(cwd)
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("COMPART_REWRITE_MODE")
            .env_remove("COMPART_ON_FAILURE")
            .env_remove("COMPART_REWRITER")
            .env_remove("COMPART_SECONDARY_TREE")
            .output()
            .expect("Failed to execute compart");
        Self::output_to_result(output)
    }

    fn output_to_result(output: Output) -> TestResult {
        TestResult {
            success: output.status.success(),
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        }
    }

    pub fn write_primary(&self, relative: &str, content: &str) {
        write_file(&self.primary_path(relative), content);
    }

    pub fn read_primary(&self, relative: &str) -> String {
        read_file(&self.primary_path(relative))
    }

    pub fn read_secondary(&self, relative: &str) -> String {
        read_file(&self.secondary_path(relative))
    }
}

pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories");
    }
    std::fs::write(path, content).expect("Failed to write file");
}

pub fn read_file(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}
