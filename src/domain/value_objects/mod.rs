//! Domain Value Objects
//!
//! Immutable value types shared by entities and services.

mod compartment_key;
mod config_warning;
mod hash;
pub mod path;
mod rewrite_mode;

pub use compartment_key::CompartmentKey;
pub use config_warning::ConfigWarning;
pub use hash::ContentHash;
pub use path::{normalize_lexically, relative_to_root, top_level_dir, PathError};
pub use rewrite_mode::{FailurePolicy, RewriteMode};
