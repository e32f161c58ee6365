//! Common test utilities for compart CLI and scenario tests.
//!
//! This module provides:
//! - `TestEnv`: an isolated primary tree plus an empty secondary tree
//! - Fixtures: a miniature dav1d layout and fake toolchain scripts

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
