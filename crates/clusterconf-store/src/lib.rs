//! clusterconf Store - atomic on-disk persistence of configuration snapshots
//!
//! Provides:
//! - Directory materialization (`fs::ensure_directory_tree`)
//! - Atomic snapshot publish through a staging directory and a rename
//!   (`snapshot::persist_snapshot`)
//! - Recovery of a snapshot stranded by a crash mid-publish
//!   (`snapshot::recover_target`)
//! - Staging/backup path helpers and snapshot loading
//!
//! Every entry point is a plain blocking function. Callers that cannot block
//! should run them on a worker thread.

pub mod errors;
pub mod fs;
pub mod snapshot;

// Re-export key types
pub use errors::Result;
pub use fs::ensure_directory_tree;
pub use snapshot::{
    load_snapshot, persist_snapshot, persist_snapshot_with, recover_target, staging_path_for,
    PersistReport,
};
