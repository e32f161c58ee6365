//! Rewrite policy value objects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How rewriter invocations are grouped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RewriteMode {
    /// One invocation per compartment, each with its own `-DPKEY=<key>`.
    #[default]
    PerCompartment,
    /// One invocation over the union of all compartments' sources. The
    /// rewriter reads each file's key from the injected `IA2_COMPARTMENT`.
    Unified,
}

impl fmt::Display for RewriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RewriteMode::PerCompartment => f.write_str("per-compartment"),
            RewriteMode::Unified => f.write_str("unified"),
        }
    }
}

impl FromStr for RewriteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "per-compartment" | "per_compartment" | "compartment" => Ok(RewriteMode::PerCompartment),
            "unified" | "union" | "single" => Ok(RewriteMode::Unified),
            other => Err(format!(
                "unknown rewrite mode '{}' (expected per-compartment or unified)",
                other
            )),
        }
    }
}

/// What happens when the rewriter exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Stop with a diagnostic (scriptable, CI-friendly)
    #[default]
    Abort,
    /// Relaunch the same invocation under a debugger, then stop
    Inspect,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => f.write_str("abort"),
            FailurePolicy::Inspect => f.write_str("inspect"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "inspect" | "debug" | "gdb" => Ok(FailurePolicy::Inspect),
            other => Err(format!(
                "unknown failure policy '{}' (expected abort or inspect)",
                other
            )),
        }
    }
}
