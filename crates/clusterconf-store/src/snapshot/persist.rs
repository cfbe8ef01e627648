//! Atomic snapshot writer.
//!
//! A persist call runs these steps in order and never goes back:
//!
//! 1. Check the sections (name validation, optional cap). Nothing on disk
//!    has been touched yet.
//! 2. Bring back a previous snapshot stranded at `<target>.backup` by a
//!    crash mid-publish, then prepare the staging directory with the
//!    directory materializer.
//! 3. Write every section as a new file under the staging directory.
//! 4. Publish: rename the staging directory onto the target.
//!
//! A failure in step 3 or 4 removes the staging directory before the error
//! is returned. A failure to remove it is only logged; the caller gets the
//! original error. Directories created in step 2 are left behind when step 2
//! itself fails.

use crate::errors::{
    file_create, file_write, short_write, staging_is_target, too_many_sections, Result,
};
use crate::fs::{ensure_directory_tree_with_mode, remove_path};
use crate::snapshot::publish::{publish, recover_target};
use clusterconf_core::config::{PersistOptions, ShortWritePolicy};
use clusterconf_core::errors::PersistError;
use clusterconf_core::model::Section;
use clusterconf_core::{log_op_end, log_op_error, log_op_start};
use clusterconf_core_types::PersistId;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::Instant;

const OP_PERSIST: &str = "persist_snapshot";

/// Outcome of a successful persist
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    /// Correlation id carried by every log event of this call
    pub persist_id: PersistId,
    /// Number of section files published
    pub sections: usize,
    /// Total bytes written across all sections
    pub bytes_written: usize,
    /// Whether an existing target was replaced
    pub replaced: bool,
}

/// Persist `sections` to `target` through `staging`, with default options.
///
/// Blocks until the snapshot is published or the attempt is rolled back.
/// `staging` must be a fresh path on the same filesystem as `target`
/// (see [`staging_path_for`](crate::snapshot::staging_path_for)) and owned
/// by this call alone.
///
/// ## Errors
///
/// A single `PersistError` whose message is `"<path>: <reason>"`:
///
/// - `InvalidSection` / `TooManySections`: rejected before touching disk
/// - `DirectoryCreate`: the staging directory could not be prepared
/// - `FileCreate` / `FileWrite`: a section file failed (staging removed)
/// - `Publish`: the rename failed (staging removed, target unchanged)
pub fn persist_snapshot(
    target: impl AsRef<Path>,
    staging: impl AsRef<Path>,
    sections: &[Section],
) -> Result<()> {
    persist_snapshot_with(target, staging, sections, &PersistOptions::default()).map(|_| ())
}

/// Persist `sections` to `target` through `staging` with explicit options.
///
/// ## Errors
///
/// See [`persist_snapshot`].
pub fn persist_snapshot_with(
    target: impl AsRef<Path>,
    staging: impl AsRef<Path>,
    sections: &[Section],
    options: &PersistOptions,
) -> Result<PersistReport> {
    let target = target.as_ref();
    let staging = staging.as_ref();
    let persist_id = PersistId::new();

    let span = tracing::info_span!(
        "persist_snapshot",
        persist_id = %persist_id,
        target = %target.display(),
    );
    let _guard = span.enter();

    let started = Instant::now();
    log_op_start!(
        OP_PERSIST,
        persist_id = %persist_id,
        target = %target.display(),
        staging = %staging.display(),
        sections = sections.len(),
    );

    let result = run(target, staging, sections, options);
    let duration_ms = started.elapsed().as_millis() as u64;

    match result {
        Ok((bytes_written, replaced)) => {
            log_op_end!(
                OP_PERSIST,
                duration_ms = duration_ms,
                target = %target.display(),
                sections = sections.len(),
                bytes = bytes_written,
                replaced = replaced,
            );
            Ok(PersistReport {
                persist_id,
                sections: sections.len(),
                bytes_written,
                replaced,
            })
        }
        Err(err) => {
            log_op_error!(OP_PERSIST, &err, duration_ms = duration_ms, target = %target.display());
            Err(err)
        }
    }
}

fn run(
    target: &Path,
    staging: &Path,
    sections: &[Section],
    options: &PersistOptions,
) -> Result<(usize, bool)> {
    check_sections(target, staging, sections, options)?;
    recover_target(target)?;

    ensure_directory_tree_with_mode(staging, options.dir_mode).map_err(|e| {
        tracing::error!(path = %e.path().display(), error = %e, "Failed to prepare staging path");
        rebind(e, staging)
    })?;

    let mut bytes_written = 0;
    for section in sections {
        match write_section(staging, section, options) {
            Ok(written) => bytes_written += written,
            Err(err) => {
                rollback(staging);
                return Err(err);
            }
        }
    }

    match publish(staging, target, options) {
        Ok(replaced) => {
            tracing::debug!(
                staging = %staging.display(),
                target = %target.display(),
                "Staging path renamed to target"
            );
            Ok((bytes_written, replaced))
        }
        Err(err) => {
            rollback(staging);
            Err(err)
        }
    }
}

fn check_sections(
    target: &Path,
    staging: &Path,
    sections: &[Section],
    options: &PersistOptions,
) -> Result<()> {
    if staging.starts_with(target) || target.starts_with(staging) {
        return Err(staging_is_target(target));
    }
    if let Some(limit) = options.max_sections {
        if sections.len() > limit {
            return Err(too_many_sections(staging, sections.len(), limit));
        }
    }
    sections.iter().try_for_each(Section::validate)
}

/// Staging preparation errors are reported against the staging path itself
fn rebind(err: PersistError, staging: &Path) -> PersistError {
    let mut rebound = PersistError::new(err.kind(), staging)
        .with_op("prepare")
        .with_reason(err.reason());
    if let Some(kind) = err.io_kind() {
        rebound = rebound.with_io_kind(kind);
    }
    rebound
}

fn write_section(staging: &Path, section: &Section, options: &PersistOptions) -> Result<usize> {
    let path = staging.join(section.relative_path());
    if let Some(parent) = path.parent() {
        if parent != staging {
            ensure_directory_tree_with_mode(parent, options.dir_mode)?;
        }
    }

    let mut file = open_exclusive(&path, options.file_mode).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "open() failed");
        file_create(&path, &e)
    })?;

    let written = write_content(&mut file, &path, &section.content, options.short_write)?;

    if options.sync {
        file.sync_all().map_err(|e| {
            tracing::error!(path = %path.display(), error = %e, "fsync() failed");
            file_write(&path, &e)
        })?;
    }
    drop(file);

    tracing::debug!(path = %path.display(), bytes = written, "Section written");
    Ok(written)
}

fn open_exclusive(path: &Path, mode: u32) -> io::Result<File> {
    let mut open = OpenOptions::new();
    open.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        open.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    open.open(path)
}

/// Write `content` and apply the short-write policy
///
/// Only a writer that stops accepting bytes (`Ok(0)`) before the end counts
/// as a short write; partial counts are simply continued.
fn write_content(
    writer: &mut impl Write,
    path: &Path,
    content: &[u8],
    policy: ShortWritePolicy,
) -> Result<usize> {
    let expected = content.len();
    let written = write_full(writer, content).map_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "write() failed");
        file_write(path, &e)
    })?;

    if written != expected {
        match policy {
            ShortWritePolicy::Strict => {
                tracing::error!(path = %path.display(), written, expected, "Short write");
                return Err(short_write(path, written, expected));
            }
            ShortWritePolicy::Lenient => {
                tracing::warn!(
                    path = %path.display(),
                    written,
                    expected,
                    "Data wasn't written completely"
                );
            }
        }
    }
    Ok(written)
}

/// Like `write_all`, but a writer returning `Ok(0)` ends the loop and the
/// byte count so far is returned instead of an error
fn write_full(writer: &mut impl Write, buf: &[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < buf.len() {
        match writer.write(&buf[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(written)
}

fn rollback(staging: &Path) {
    match remove_path(staging) {
        Ok(()) => tracing::debug!(path = %staging.display(), "Staging path removed"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(
            path = %staging.display(),
            error = %e,
            "Failed to remove staging path"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterconf_core::errors::PersistErrorKind;
    use clusterconf_core::logging_facility::init_test_capture;
    use clusterconf_core::types::schema::FIELD_PATH;
    use tempfile::TempDir;

    /// Accepts at most `limit` bytes per write call, and nothing once
    /// `capacity` bytes are stored
    struct Trickle {
        limit: usize,
        capacity: usize,
        interrupt_once: bool,
        data: Vec<u8>,
    }

    impl Trickle {
        fn new(limit: usize, capacity: usize) -> Self {
            Self {
                limit,
                capacity,
                interrupt_once: false,
                data: Vec::new(),
            }
        }
    }

    impl Write for Trickle {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if self.interrupt_once {
                self.interrupt_once = false;
                return Err(io::Error::from(io::ErrorKind::Interrupted));
            }
            let room = self.capacity - self.data.len();
            let n = buf.len().min(self.limit).min(room);
            self.data.extend_from_slice(&buf[..n]);
            Ok(n)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_full_continues_partial_writes() {
        let mut sink = Trickle::new(3, usize::MAX);
        sink.interrupt_once = true;

        let written = write_full(&mut sink, b"hello world").unwrap();

        assert_eq!(written, 11);
        assert_eq!(sink.data, b"hello world");
    }

    #[test]
    fn test_write_full_stops_when_writer_is_full() {
        let mut sink = Trickle::new(3, 5);
        assert_eq!(write_full(&mut sink, b"hello world").unwrap(), 5);
        assert_eq!(sink.data, b"hello");
    }

    #[test]
    fn test_write_full_empty_buffer() {
        let mut sink = Trickle::new(0, 0);
        assert_eq!(write_full(&mut sink, b"").unwrap(), 0);
    }

    #[test]
    fn test_strict_short_write_is_file_write_error() {
        let mut sink = Trickle::new(4, 6);
        let path = Path::new("/stage/a.yml");

        let err = write_content(&mut sink, path, b"0123456789", ShortWritePolicy::Strict)
            .unwrap_err();

        assert_eq!(err.kind(), PersistErrorKind::FileWrite);
        assert_eq!(err.io_kind(), Some(io::ErrorKind::WriteZero));
        assert_eq!(err.path(), path);
        assert_eq!(err.reason(), "short write: 6 of 10 bytes written");
    }

    #[test]
    fn test_lenient_short_write_warns_and_continues() {
        let capture = init_test_capture();
        let mut sink = Trickle::new(4, 6);
        let path = Path::new("/stage/lenient-short-write.yml");

        let written =
            write_content(&mut sink, path, b"0123456789", ShortWritePolicy::Lenient).unwrap();

        assert_eq!(written, 6);
        let warnings = capture.count_events(|e| {
            e.level == tracing::Level::WARN
                && e.field(FIELD_PATH) == Some("/stage/lenient-short-write.yml")
                && e.field("written") == Some("6")
                && e.field("expected") == Some("10")
        });
        assert_eq!(warnings, 1);
    }

    #[test]
    fn test_complete_write_ignores_policy() {
        let mut sink = Trickle::new(2, usize::MAX);
        let written =
            write_content(&mut sink, Path::new("/s/a"), b"abcde", ShortWritePolicy::Strict)
                .unwrap();
        assert_eq!(written, 5);
    }

    #[test]
    fn test_check_sections_rejects_before_disk() {
        let temp_dir = TempDir::new().unwrap();
        let staging = temp_dir.path().join("stage");
        let sections = vec![Section::new("a", "1"), Section::new("b", "2")];
        let options = PersistOptions::default().with_max_sections(1);

        let err = check_sections(&temp_dir.path().join("t"), &staging, &sections, &options)
            .unwrap_err();

        assert_eq!(err.kind(), PersistErrorKind::TooManySections);
        assert!(!staging.exists());
    }

    #[test]
    fn test_check_sections_rejects_same_paths() {
        let path = Path::new("/cfg/current");
        let err = check_sections(path, path, &[], &PersistOptions::default()).unwrap_err();
        assert_eq!(err.kind(), PersistErrorKind::Publish);
    }

    #[test]
    fn test_check_sections_rejects_nested_paths() {
        let target = Path::new("/cfg/current");
        let options = PersistOptions::default();

        let inside = check_sections(target, &target.join(".stage-1"), &[], &options).unwrap_err();
        let around = check_sections(target, Path::new("/cfg"), &[], &options).unwrap_err();

        assert_eq!(inside.kind(), PersistErrorKind::Publish);
        assert_eq!(around.kind(), PersistErrorKind::Publish);
        assert!(check_sections(target, Path::new("/cfg/.current.stage-1"), &[], &options).is_ok());
    }

    #[test]
    fn test_rebind_keeps_reason() {
        let inner = PersistError::new(PersistErrorKind::DirectoryCreate, "/a/b")
            .with_reason("Permission denied")
            .with_io_kind(io::ErrorKind::PermissionDenied);

        let outer = rebind(inner, Path::new("/a/b/stage"));

        assert_eq!(outer.to_string(), "/a/b/stage: Permission denied");
        assert_eq!(outer.io_kind(), Some(io::ErrorKind::PermissionDenied));
    }

    #[test]
    fn test_rollback_missing_staging_is_quiet() {
        let temp_dir = TempDir::new().unwrap();
        rollback(&temp_dir.path().join("never-created"));
    }
}
