//! Error helpers for clusterconf-store
//!
//! Wraps clusterconf-core PersistError with one constructor per failure site

use clusterconf_core::errors::{PersistError, PersistErrorKind};
use std::io;
use std::path::Path;

/// Result type alias using PersistError
pub type Result<T> = std::result::Result<T, PersistError>;

/// A directory component could not be created or inspected
pub fn directory_create(path: &Path, err: &io::Error) -> PersistError {
    PersistError::from_io(PersistErrorKind::DirectoryCreate, path, err).with_op("mkdir")
}

/// A path component exists and is not a directory
pub fn not_a_directory(path: &Path) -> PersistError {
    PersistError::new(PersistErrorKind::DirectoryCreate, path)
        .with_op("mkdir")
        .with_reason("File exists (not a directory)")
        .with_io_kind(io::ErrorKind::AlreadyExists)
}

/// A section file could not be created
pub fn file_create(path: &Path, err: &io::Error) -> PersistError {
    PersistError::from_io(PersistErrorKind::FileCreate, path, err).with_op("open_section")
}

/// Writing or syncing a section file failed
pub fn file_write(path: &Path, err: &io::Error) -> PersistError {
    PersistError::from_io(PersistErrorKind::FileWrite, path, err).with_op("write_section")
}

/// A write stored fewer bytes than requested
pub fn short_write(path: &Path, written: usize, expected: usize) -> PersistError {
    PersistError::new(PersistErrorKind::FileWrite, path)
        .with_op("write_section")
        .with_reason(format!("short write: {} of {} bytes written", written, expected))
        .with_io_kind(io::ErrorKind::WriteZero)
}

/// Moving a snapshot into (or out of) the target location failed
pub fn publish(path: &Path, err: &io::Error) -> PersistError {
    PersistError::from_io(PersistErrorKind::Publish, path, err).with_op("publish")
}

/// Staging and target are the same path, or one lies inside the other
pub fn staging_is_target(path: &Path) -> PersistError {
    PersistError::new(PersistErrorKind::Publish, path)
        .with_op("publish")
        .with_reason("staging path must not equal or nest with target path")
        .with_io_kind(io::ErrorKind::InvalidInput)
}

/// The snapshot carries more sections than allowed
pub fn too_many_sections(staging: &Path, count: usize, limit: usize) -> PersistError {
    PersistError::new(PersistErrorKind::TooManySections, staging)
        .with_op("check_sections")
        .with_reason(format!("{} sections exceed the limit of {}", count, limit))
}

/// A published snapshot could not be read back
pub fn read_error(path: &Path, err: &io::Error) -> PersistError {
    PersistError::from_io(PersistErrorKind::Read, path, err).with_op("load_snapshot")
}
