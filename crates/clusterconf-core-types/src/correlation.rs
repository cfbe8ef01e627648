//! Correlation identifier for persist operations
//!
//! Each call into the snapshot writer gets a fresh `PersistId` so every log
//! event it emits (directory creation, section writes, publish, rollback)
//! can be tied back to one attempt.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a single persist attempt
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistId(String);

impl PersistId {
    /// Generate a new random PersistId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Create from an existing string (for deserialization)
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for PersistId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PersistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
