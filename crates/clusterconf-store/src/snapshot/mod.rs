//! Snapshot persistence layer.
//!
//! This module publishes configuration snapshots to a target directory so
//! that readers only ever see a complete snapshot or none at all.
//!
//! ## Responsibilities
//!
//! - Materialize sections as files under a private staging directory
//! - Publish the staging directory to the target with a rename
//! - Remove the staging directory when anything fails before publish
//! - Bring back a previous snapshot stranded by a crash mid-publish
//! - Read a published snapshot back
//!
//! ## Non-Responsibilities
//!
//! - Arbitrating concurrent writers to one target (callers serialize)
//! - Interpreting section content
//! - Running off the caller's thread

pub mod load;
pub mod persist;
mod publish;
pub mod staging;

// Re-export primary types
pub use load::load_snapshot;
pub use persist::{persist_snapshot, persist_snapshot_with, PersistReport};
pub use publish::recover_target;
pub use staging::{backup_path_for, remove_stale_staging, staging_path_for};
