//! Snapshot data model
//!
//! A snapshot is an ordered list of named sections. Each section becomes one
//! file when persisted.

pub mod section;
pub mod snapshot;

pub use section::{validate_section_name, Section};
pub use snapshot::ConfigSnapshot;
