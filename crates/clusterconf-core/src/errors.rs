use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using PersistError
pub type Result<T> = std::result::Result<T, PersistError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by a persist or load call maps to exactly one of
/// these kinds. The kind tells the caller which step failed; the error's
/// path tells it where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersistErrorKind {
    /// A directory component could not be created, or a path component
    /// exists and is not a directory
    DirectoryCreate,
    /// A section file could not be created (including an existing file
    /// under exclusive-create)
    FileCreate,
    /// Writing, syncing or closing a section file failed, or a short write
    /// happened under the strict policy
    FileWrite,
    /// Moving the staged snapshot to the target path failed
    Publish,
    /// A section name is empty, absolute, or escapes the staging directory
    InvalidSection,
    /// The snapshot carries more sections than the configured cap
    TooManySections,
    /// A published snapshot could not be read back
    Read,
}

impl PersistErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            PersistErrorKind::DirectoryCreate => "ERR_DIRECTORY_CREATE",
            PersistErrorKind::FileCreate => "ERR_FILE_CREATE",
            PersistErrorKind::FileWrite => "ERR_FILE_WRITE",
            PersistErrorKind::Publish => "ERR_PUBLISH",
            PersistErrorKind::InvalidSection => "ERR_INVALID_SECTION",
            PersistErrorKind::TooManySections => "ERR_TOO_MANY_SECTIONS",
            PersistErrorKind::Read => "ERR_READ",
        }
    }

    /// All kinds, in declaration order
    pub fn all() -> &'static [PersistErrorKind] {
        &[
            PersistErrorKind::DirectoryCreate,
            PersistErrorKind::FileCreate,
            PersistErrorKind::FileWrite,
            PersistErrorKind::Publish,
            PersistErrorKind::InvalidSection,
            PersistErrorKind::TooManySections,
            PersistErrorKind::Read,
        ]
    }
}

/// Canonical structured error type
///
/// Binds the offending path to a reason (usually the OS error text). It
/// displays as `"<path>: <reason>"`, which is the string handed back to
/// callers that only want something to log or show.
#[derive(Debug, Clone, Error)]
#[error("{}: {}", .path.display(), .reason)]
pub struct PersistError {
    kind: PersistErrorKind,
    path: PathBuf,
    reason: String,
    io_kind: Option<io::ErrorKind>,
    op: Option<String>,
}

impl PersistError {
    /// Create a new error of the given kind bound to `path`
    pub fn new(kind: PersistErrorKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
            reason: String::new(),
            io_kind: None,
            op: None,
        }
    }

    /// Create an error from an OS-level failure on `path`
    ///
    /// The reason is the OS error description and the `io::ErrorKind` is kept
    /// for programmatic checks.
    pub fn from_io(kind: PersistErrorKind, path: impl Into<PathBuf>, err: &io::Error) -> Self {
        Self::new(kind, path)
            .with_reason(err.to_string())
            .with_io_kind(err.kind())
    }

    /// Add the reason text
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }

    /// Add the underlying io::ErrorKind
    pub fn with_io_kind(mut self, io_kind: io::ErrorKind) -> Self {
        self.io_kind = Some(io_kind);
        self
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> PersistErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the offending path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the reason text
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// Get the underlying io::ErrorKind, if the failure came from the OS
    pub fn io_kind(&self) -> Option<io::ErrorKind> {
        self.io_kind
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Human-readable `"<path>: <reason>"` message
    pub fn message(&self) -> String {
        self.to_string()
    }
}

// ========== End Error Facility ==========

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_display_is_path_colon_reason() {
        let err = PersistError::new(PersistErrorKind::Publish, "/cfg/current")
            .with_reason("Directory not empty");
        assert_eq!(err.to_string(), "/cfg/current: Directory not empty");
        assert_eq!(err.message(), err.to_string());
    }

    #[test]
    fn test_from_io_keeps_kind_and_text() {
        let io_err = io::Error::new(io::ErrorKind::AlreadyExists, "File exists");
        let err = PersistError::from_io(PersistErrorKind::FileCreate, "/stage/a.yml", &io_err);

        assert_eq!(err.kind(), PersistErrorKind::FileCreate);
        assert_eq!(err.io_kind(), Some(io::ErrorKind::AlreadyExists));
        assert_eq!(err.reason(), "File exists");
        assert_eq!(err.path(), Path::new("/stage/a.yml"));
    }

    #[test]
    fn test_codes_are_unique() {
        let codes: HashSet<_> = PersistErrorKind::all().iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), PersistErrorKind::all().len());
        assert!(codes.iter().all(|c| c.starts_with("ERR_")));
    }

    #[test]
    fn test_op_context() {
        let err = PersistError::new(PersistErrorKind::Read, "/cfg").with_op("load_snapshot");
        assert_eq!(err.op(), Some("load_snapshot"));
        assert_eq!(err.code(), "ERR_READ");
    }
}
