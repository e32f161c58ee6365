//! Operator interrupt flag
//!
//! Set from the Ctrl-C handler; checked at stage boundaries so a run stops
//! before starting new work instead of mid-write.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::{CompartError, CompartResult};

#[derive(Debug, Clone, Default)]
pub struct Interrupt(Arc<AtomicBool>);

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trigger(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// `Err(Interrupted)` once triggered
    pub fn check(&self) -> CompartResult<()> {
        if self.is_set() {
            return Err(CompartError::Interrupted);
        }
        Ok(())
    }
}
