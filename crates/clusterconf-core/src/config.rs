//! Persist options
//!
//! Options control file modes, durability and the policy for the two
//! behaviours that callers disagree on (short writes, keeping the previous
//! snapshot). Every field has a default, so an empty TOML document is valid.
//!
//! ```toml
//! dir_mode = 0o755
//! file_mode = 0o644
//! max_sections = 100
//! short_write = "strict"
//! sync = true
//! keep_backup = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default mode for created directories: owner rwx, group/other r-x
pub const DEFAULT_DIR_MODE: u32 = 0o755;

/// Default mode for section files: owner rw, group/other r
pub const DEFAULT_FILE_MODE: u32 = 0o644;

const MAX_MODE: u32 = 0o7777;

/// Errors raised while loading or validating options
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The options file could not be read
    #[error("failed to read options file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The options document is not valid TOML for `PersistOptions`
    #[error("failed to parse options: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value outside its allowed range
    #[error("invalid option {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// What to do when a single write call stores fewer bytes than requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShortWritePolicy {
    /// Fail the section with `FileWrite`
    #[default]
    Strict,
    /// Log a warning and keep going
    Lenient,
}

/// Options for a persist call
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PersistOptions {
    /// Mode for directories created under the staging path
    pub dir_mode: u32,
    /// Mode for section files
    pub file_mode: u32,
    /// Optional cap on the number of sections in one snapshot
    pub max_sections: Option<usize>,
    pub short_write: ShortWritePolicy,
    /// fsync section files, and the target's parent after publish
    pub sync: bool,
    /// Keep the replaced snapshot at `<target>.backup`
    pub keep_backup: bool,
}

impl Default for PersistOptions {
    fn default() -> Self {
        Self {
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            max_sections: None,
            short_write: ShortWritePolicy::Strict,
            sync: true,
            keep_backup: false,
        }
    }
}

impl PersistOptions {
    /// Parse and validate options from a TOML document
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for malformed TOML or unknown fields,
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let options: PersistOptions = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    /// Load and validate options from a TOML file
    ///
    /// # Errors
    ///
    /// `ConfigError::Read` if the file cannot be read, otherwise as
    /// [`PersistOptions::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), ?options, "Loaded persist options");
        Ok(options)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// `ConfigError::Invalid` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dir_mode > MAX_MODE {
            return Err(ConfigError::Invalid {
                field: "dir_mode",
                reason: format!("{:#o} exceeds {:#o}", self.dir_mode, MAX_MODE),
            });
        }
        if self.file_mode > MAX_MODE {
            return Err(ConfigError::Invalid {
                field: "file_mode",
                reason: format!("{:#o} exceeds {:#o}", self.file_mode, MAX_MODE),
            });
        }
        if self.max_sections == Some(0) {
            return Err(ConfigError::Invalid {
                field: "max_sections",
                reason: "must be greater than zero when set".to_string(),
            });
        }
        Ok(())
    }

    pub fn with_max_sections(mut self, max: usize) -> Self {
        self.max_sections = Some(max);
        self
    }

    pub fn with_short_write(mut self, policy: ShortWritePolicy) -> Self {
        self.short_write = policy;
        self
    }

    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    pub fn with_keep_backup(mut self, keep: bool) -> Self {
        self.keep_backup = keep;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = PersistOptions::default();
        assert_eq!(options.dir_mode, 0o755);
        assert_eq!(options.file_mode, 0o644);
        assert_eq!(options.short_write, ShortWritePolicy::Strict);
        assert!(options.sync);
        assert!(!options.keep_backup);
        assert!(options.max_sections.is_none());
    }

    #[test]
    fn test_empty_document_is_default() {
        let options = PersistOptions::from_toml_str("").unwrap();
        assert_eq!(options, PersistOptions::default());
    }

    #[test]
    fn test_parse_all_fields() {
        let options = PersistOptions::from_toml_str(
            r#"
            dir_mode = 0o700
            file_mode = 0o600
            max_sections = 100
            short_write = "lenient"
            sync = false
            keep_backup = true
            "#,
        )
        .unwrap();

        assert_eq!(options.dir_mode, 0o700);
        assert_eq!(options.file_mode, 0o600);
        assert_eq!(options.max_sections, Some(100));
        assert_eq!(options.short_write, ShortWritePolicy::Lenient);
        assert!(!options.sync);
        assert!(options.keep_backup);
    }

    #[test]
    fn test_rejects_unknown_field() {
        let err = PersistOptions::from_toml_str("fsync_dirs = true").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_rejects_zero_section_cap() {
        let err = PersistOptions::from_toml_str("max_sections = 0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "max_sections",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_oversized_mode() {
        let err = PersistOptions::from_toml_str("file_mode = 0o17777").unwrap_err();
        assert!(err.to_string().contains("file_mode"));
    }
}
