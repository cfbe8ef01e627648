//! Staging and backup path naming
//!
//! Both paths are siblings of the target so that renames between them stay
//! on one filesystem.

use crate::errors::{read_error, Result};
use crate::fs::remove_path;
use std::ffi::{OsStr, OsString};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const STAGE_MARKER: &str = ".stage-";
const BACKUP_SUFFIX: &str = ".backup";

/// Fresh staging path next to `target`
///
/// For `/cfg/current` this returns `/cfg/.current.stage-<uuid>`. Each call
/// yields a new path, so a leftover from a crashed attempt is never reused.
pub fn staging_path_for(target: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(target.file_name().unwrap_or_else(|| OsStr::new("snapshot")));
    name.push(STAGE_MARKER);
    name.push(Uuid::new_v4().simple().to_string());
    sibling(target, name)
}

/// Where a replaced snapshot is parked during publish: `<target>.backup`
pub fn backup_path_for(target: &Path) -> PathBuf {
    match target.file_name() {
        Some(file_name) => {
            let mut name = file_name.to_os_string();
            name.push(BACKUP_SUFFIX);
            sibling(target, name)
        }
        None => {
            let mut raw = target.as_os_str().to_os_string();
            raw.push(BACKUP_SUFFIX);
            PathBuf::from(raw)
        }
    }
}

/// True if `path` looks like something `staging_path_for` produced
pub fn is_staging_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') && n.contains(STAGE_MARKER))
        .unwrap_or(false)
}

/// Remove staging directories left next to `target` by crashed attempts
///
/// Only call this while no persist for `target` is in flight. Entries that
/// cannot be removed are logged and skipped. Returns how many were removed.
///
/// # Errors
///
/// `PersistErrorKind::Read` if the parent directory cannot be listed.
pub fn remove_stale_staging(target: &Path) -> Result<usize> {
    let stem = match target.file_name() {
        Some(name) => name.to_os_string(),
        None => return Ok(0),
    };
    let mut prefix = OsString::from(".");
    prefix.push(&stem);
    prefix.push(STAGE_MARKER);
    let prefix = prefix.to_string_lossy().into_owned();

    let parent = match target.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let entries = match fs::read_dir(parent) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(read_error(parent, &e)),
    };

    let mut removed = 0;
    for entry in entries {
        let entry = entry.map_err(|e| read_error(parent, &e))?;
        let path = entry.path();
        let matches = entry
            .file_name()
            .to_str()
            .map(|n| n.starts_with(&prefix))
            .unwrap_or(false);
        if !matches || !is_staging_name(&path) {
            continue;
        }
        match remove_path(&path) {
            Ok(()) => {
                tracing::info!(path = %path.display(), "Removed stale staging path");
                removed += 1;
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove stale staging path");
            }
        }
    }
    Ok(removed)
}

fn sibling(target: &Path, name: OsString) -> PathBuf {
    match target.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
