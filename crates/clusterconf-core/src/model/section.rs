use crate::errors::{PersistError, PersistErrorKind, Result};
use std::path::PathBuf;

/// One named unit of configuration content, persisted as one file
///
/// The name is used verbatim as a relative path under the snapshot
/// directory; a name such as `vshard/groups.yml` lands in a subdirectory.
/// Content bytes are written unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub name: String,
    pub content: Vec<u8>,
}

impl Section {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Check that the name is safe to join onto a snapshot directory
    ///
    /// # Errors
    ///
    /// `PersistErrorKind::InvalidSection` bound to the name.
    pub fn validate(&self) -> Result<()> {
        validate_section_name(&self.name).map_err(|reason| {
            PersistError::new(PersistErrorKind::InvalidSection, &self.name)
                .with_op("validate_section")
                .with_reason(reason)
        })
    }

    /// Relative path of the section file inside a snapshot directory
    pub fn relative_path(&self) -> PathBuf {
        self.name.split('/').collect()
    }

    /// Content length in bytes
    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// Validate a section name, returning the reason it was rejected
///
/// Accepted names are non-empty, relative, `/`-separated and made only of
/// normal components: no empty components, no `.` or `..`, no NUL bytes.
pub fn validate_section_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.is_empty() {
        return Err("section name is empty");
    }
    if name.contains('\0') {
        return Err("section name contains a NUL byte");
    }
    if name.starts_with('/') {
        return Err("section name must be relative");
    }
    for component in name.split('/') {
        match component {
            "" => return Err("section name has an empty path component"),
            "." | ".." => return Err("section name must not contain '.' or '..' components"),
            _ => {}
        }
    }
    Ok(())
}
