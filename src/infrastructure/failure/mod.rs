//! Failure handler implementations

mod inspect;

pub use inspect::InspectOnFailure;

use crate::domain::ports::{AbortOnFailure, FailureHandler};
use crate::domain::value_objects::FailurePolicy;

/// Handler for a configured policy
pub fn handler_for(policy: FailurePolicy, debugger: &[String]) -> Box<dyn FailureHandler> {
    match policy {
        FailurePolicy::Abort => Box::new(AbortOnFailure),
        FailurePolicy::Inspect => Box::new(InspectOnFailure::new(debugger.to_vec())),
    }
}
