//! clusterconf Core - domain model and ambient facilities
//!
//! This crate provides the pieces shared by every layer that persists
//! configuration snapshots:
//! - `Section` / `ConfigSnapshot` models and section-name validation
//! - The structured error facility (`PersistError`, `PersistErrorKind`)
//! - `PersistOptions`, loadable from TOML
//! - The logging facility (init profiles, op macros, test capture)
//!
//! The filesystem work itself lives in `clusterconf-store`.

pub mod config;
pub mod errors;
pub mod logging_facility;
pub mod model;

/// Re-exported so the logging macros resolve schema constants through `$crate`.
pub use clusterconf_core_types as types;

// Re-export commonly used types
pub use config::{ConfigError, PersistOptions, ShortWritePolicy};
pub use errors::{PersistError, PersistErrorKind, Result};
pub use model::{ConfigSnapshot, Section};
