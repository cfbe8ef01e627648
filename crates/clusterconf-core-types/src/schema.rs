//! Canonical schema constants for structured logging and events
//!
//! These constants keep field names identical across every crate that logs
//! persist operations.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_PERSIST_ID: &str = "persist_id";

// Filesystem locations
pub const FIELD_TARGET: &str = "target";
pub const FIELD_STAGING: &str = "staging";
pub const FIELD_PATH: &str = "path";

// Collection sizes
pub const FIELD_SECTIONS: &str = "sections";
pub const FIELD_BYTES: &str = "bytes";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
