//! Application Layer
//!
//! Use cases that drive the domain services against the ports.
//! This layer:
//! - Depends on Domain layer (entities, services, ports)
//! - Does NOT contain business rules (those are in Domain)
//! - Coordinates between Infrastructure and Domain
//!
//! ## Use Cases
//!
//! - `Pipeline` - the full bootstrap → rewrite → build run, and each stage alone
//! - `compile_db` - database reading and canonicalization
//! - `inject_tree`, `apply_patches`, `merge_kept`, `sync_secondary`
//! - `BuildDriver` - configure, build, and call-gate linking

pub mod build;
pub mod compile_db;
pub mod diff;
pub mod inject;
pub mod interrupt;
pub mod merge;
pub mod patch;
pub mod pipeline;
pub mod rewrite;
pub mod sync_tree;

pub use build::BuildDriver;
pub use compile_db::{canonicalize_database, read_sources, Canonicalized};
pub use inject::{inject_tree, InjectReport, InjectedFile};
pub use interrupt::Interrupt;
pub use merge::{merge_kept, MergeReport};
pub use patch::{apply_patches, PatchReport, PatchedFile};
pub use pipeline::{Pipeline, PipelineRun, RunOptions, RunReport, Tree};
pub use rewrite::run_rewriter;
pub use sync_tree::{sync_secondary, SyncReport};
