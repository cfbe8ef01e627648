//! Read a published snapshot back into memory.

use crate::errors::{read_error, Result};
use clusterconf_core::errors::{PersistError, PersistErrorKind};
use clusterconf_core::model::{ConfigSnapshot, Section};
use std::fs;
use std::path::Path;

/// Load every file under `path` as a section
///
/// Subdirectories are walked recursively and their files are named with
/// `/`-joined relative paths, so a snapshot written with a section called
/// `vshard/groups.yml` loads back under the same name. Sections come back
/// sorted by name.
///
/// ## Errors
///
/// `PersistErrorKind::Read` bound to the entry that could not be listed or
/// read, or whose name is not valid UTF-8.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<ConfigSnapshot> {
    let root = path.as_ref();
    let mut sections = Vec::new();
    collect(root, "", &mut sections)?;
    sections.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::debug!(path = %root.display(), sections = sections.len(), "Loaded snapshot");
    Ok(ConfigSnapshot::from(sections))
}

fn collect(dir: &Path, prefix: &str, out: &mut Vec<Section>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| read_error(dir, &e))?;

    for entry in entries {
        let entry = entry.map_err(|e| read_error(dir, &e))?;
        let path = entry.path();
        let file_name = entry.file_name();
        let file_name = file_name.to_str().ok_or_else(|| {
            PersistError::new(PersistErrorKind::Read, &path)
                .with_op("load_snapshot")
                .with_reason("file name is not valid UTF-8")
        })?;
        let name = if prefix.is_empty() {
            file_name.to_string()
        } else {
            format!("{}/{}", prefix, file_name)
        };

        let meta = fs::metadata(&path).map_err(|e| read_error(&path, &e))?;
        if meta.is_dir() {
            collect(&path, &name, out)?;
        } else {
            let content = fs::read(&path).map_err(|e| read_error(&path, &e))?;
            out.push(Section::new(name, content));
        }
    }
    Ok(())
}
