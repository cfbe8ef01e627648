//! Removal and directory sync helpers

use std::fs::{self, File};
use std::io;
use std::path::Path;

/// Remove a path whatever it is: directories recursively, files and
/// symlinks directly
pub fn remove_path(path: &Path) -> io::Result<()> {
    let meta = fs::symlink_metadata(path)?;
    if meta.is_dir() {
        fs::remove_dir_all(path)
    } else {
        fs::remove_file(path)
    }
}

/// fsync the directory containing `path`, so a rename into it is durable
///
/// No-op on non-Unix platforms, where directories cannot be opened for sync.
pub fn sync_parent_dir(path: &Path) -> io::Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    if cfg!(unix) {
        File::open(parent)?.sync_all()?;
    }
    Ok(())
}
