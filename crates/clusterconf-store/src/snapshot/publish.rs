//! Publish step: make the staged snapshot visible at the target path.
//!
//! With no existing target this is a single rename. A directory rename
//! cannot replace a non-empty directory, so an existing target is first
//! moved aside to `<target>.backup`. Between the two renames the target does
//! not exist; readers never see a mix of old and new sections. A crash in
//! that window leaves the previous snapshot at `<target>.backup`, and
//! [`recover_target`] moves it back.

use crate::errors::{publish as publish_error, Result};
use crate::fs::{remove_path, sync_parent_dir};
use crate::snapshot::staging::backup_path_for;
use clusterconf_core::config::PersistOptions;
use std::fs;
use std::io;
use std::path::Path;

/// Rename `staging` onto `target`. Returns whether a previous target was
/// replaced.
///
/// On error the target is back in its pre-call state and `staging` is left
/// for the caller to roll back.
pub(crate) fn publish(staging: &Path, target: &Path, options: &PersistOptions) -> Result<bool> {
    let backup = backup_path_for(target);

    let replaced = match fs::symlink_metadata(target) {
        Ok(_) => {
            park_previous(target, &backup)?;
            true
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => false,
        Err(e) => {
            tracing::error!(path = %target.display(), error = %e, "stat() failed");
            return Err(publish_error(target, &e));
        }
    };

    if let Err(e) = fs::rename(staging, target) {
        tracing::error!(
            staging = %staging.display(),
            target = %target.display(),
            error = %e,
            "rename() failed"
        );
        if replaced {
            restore_previous(&backup, target);
        }
        return Err(publish_error(target, &e));
    }

    if options.sync {
        if let Err(e) = sync_parent_dir(target) {
            tracing::warn!(path = %target.display(), error = %e, "Failed to sync target directory");
        }
    }

    if replaced && !options.keep_backup {
        if let Err(e) = remove_path(&backup) {
            tracing::warn!(path = %backup.display(), error = %e, "Failed to remove previous snapshot");
        }
    }

    Ok(replaced)
}

/// Move a previous snapshot stranded at `<target>.backup` back to `target`
///
/// Does nothing when `target` exists or there is no backup. Returns whether
/// a snapshot was restored. Every persist runs this before staging, so the
/// next write after a crash heals the target on its own.
///
/// ## Errors
///
/// `PersistErrorKind::Publish` bound to `target` when either path cannot be
/// inspected or the rename fails.
pub fn recover_target(target: impl AsRef<Path>) -> Result<bool> {
    let target = target.as_ref();
    match fs::symlink_metadata(target) {
        Ok(_) => return Ok(false),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::error!(path = %target.display(), error = %e, "stat() failed");
            return Err(publish_error(target, &e));
        }
    }

    let backup = backup_path_for(target);
    match fs::symlink_metadata(&backup) {
        Ok(_) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => {
            tracing::error!(path = %backup.display(), error = %e, "stat() failed");
            return Err(publish_error(target, &e));
        }
    }

    fs::rename(&backup, target).map_err(|e| {
        tracing::error!(
            backup = %backup.display(),
            target = %target.display(),
            error = %e,
            "Failed to recover previous snapshot"
        );
        publish_error(target, &e)
    })?;
    tracing::warn!(
        backup = %backup.display(),
        target = %target.display(),
        "Recovered previous snapshot left by an interrupted publish"
    );
    Ok(true)
}

fn park_previous(target: &Path, backup: &Path) -> Result<()> {
    match remove_path(backup) {
        Ok(()) => tracing::debug!(path = %backup.display(), "Removed stale backup"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            tracing::error!(path = %backup.display(), error = %e, "Failed to remove stale backup");
            return Err(publish_error(backup, &e));
        }
    }

    fs::rename(target, backup).map_err(|e| {
        tracing::error!(
            target = %target.display(),
            backup = %backup.display(),
            error = %e,
            "Failed to move previous snapshot aside"
        );
        publish_error(target, &e)
    })?;
    tracing::debug!(target = %target.display(), backup = %backup.display(), "Previous snapshot moved aside");
    Ok(())
}

fn restore_previous(backup: &Path, target: &Path) {
    match fs::rename(backup, target) {
        Ok(()) => tracing::info!(path = %target.display(), "Previous snapshot restored"),
        Err(e) => tracing::error!(
            backup = %backup.display(),
            target = %target.display(),
            error = %e,
            "Failed to restore previous snapshot"
        ),
    }
}
