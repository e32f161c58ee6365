//! compart - build-time orchestrator for hardware-isolated C compartments
//!
//! compart partitions a C codebase into compartments by top-level directory,
//! stamps each compartment's entry file with its declaration preamble, drives
//! an external source rewriter that inserts call gates, patches the rewriter's
//! known blind spots, and builds the result into a separate working copy.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

// Re-exports for convenience
pub use application::{Interrupt, Pipeline, PipelineRun, RunOptions, RunReport, Tree};
pub use config::Config;
pub use domain::entities::{Assignment, Compartment, SourcePatch};
pub use domain::services::{assign, partition, Partition};
pub use domain::value_objects::{CompartmentKey, FailurePolicy, RewriteMode};
pub use error::{CompartError, CompartResult, ErrorCategory};
