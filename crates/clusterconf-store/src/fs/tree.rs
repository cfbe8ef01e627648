//! Directory materializer
//!
//! Walks a path one component at a time and creates whatever is missing.
//! Existing directories are accepted; an existing non-directory stops the
//! walk with an error naming that component.

use crate::errors::{directory_create, not_a_directory, Result};
use clusterconf_core::config::DEFAULT_DIR_MODE;
use std::fs::{self, DirBuilder};
use std::io;
use std::path::{Component, Path, PathBuf};

/// Create every missing directory on `path` with the default mode (0o755)
///
/// Idempotent. Consecutive separators and `.` components are ignored; an
/// empty path is a no-op.
///
/// # Errors
///
/// `PersistErrorKind::DirectoryCreate` bound to the first component that
/// could not be created or exists as something other than a directory.
/// Nothing past that component is created.
pub fn ensure_directory_tree(path: impl AsRef<Path>) -> Result<()> {
    ensure_directory_tree_with_mode(path, DEFAULT_DIR_MODE)
}

/// Like [`ensure_directory_tree`] with an explicit mode for new directories
///
/// The mode is subject to the process umask. It is ignored on non-Unix
/// platforms.
///
/// # Errors
///
/// See [`ensure_directory_tree`].
pub fn ensure_directory_tree_with_mode(path: impl AsRef<Path>, mode: u32) -> Result<()> {
    let path = path.as_ref();
    let mut current = PathBuf::with_capacity(path.as_os_str().len());
    let mut created = 0usize;

    for component in path.components() {
        match component {
            Component::CurDir => continue,
            Component::Prefix(_) | Component::RootDir => {
                current.push(component.as_os_str());
                continue;
            }
            Component::ParentDir | Component::Normal(_) => current.push(component.as_os_str()),
        }

        match fs::metadata(&current) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                tracing::warn!(path = %current.display(), "Path component exists and is not a directory");
                return Err(not_a_directory(&current));
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                create_one(&current, mode)?;
                created += 1;
            }
            Err(e) => {
                tracing::error!(path = %current.display(), error = %e, "stat() failed");
                return Err(directory_create(&current, &e));
            }
        }
    }

    tracing::debug!(path = %path.display(), created, "Directory tree ready");
    Ok(())
}

fn create_one(dir: &Path, mode: u32) -> Result<()> {
    let mut builder = DirBuilder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    match builder.create(dir) {
        Ok(()) => {
            tracing::info!(path = %dir.display(), mode = %format!("{:o}", mode), "Directory created");
            Ok(())
        }
        // Lost a race with another creator; fine as long as it is a directory.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => match fs::metadata(dir) {
            Ok(meta) if meta.is_dir() => Ok(()),
            _ => Err(not_a_directory(dir)),
        },
        Err(e) => {
            tracing::error!(path = %dir.display(), error = %e, mode = %format!("{:o}", mode), "mkdir() failed");
            Err(directory_create(dir, &e))
        }
    }
}
