//! Filesystem primitives
//!
//! Provides:
//! - Directory tree materialization with a fixed mode
//! - Recursive removal and directory fsync used by publish/rollback

mod durable;
mod tree;

pub use durable::{remove_path, sync_parent_dir};
pub use tree::{ensure_directory_tree, ensure_directory_tree_with_mode};
