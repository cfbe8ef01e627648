// Test suite for the directory materializer
// Covers idempotency, non-directory collisions and relative paths

#![allow(clippy::unwrap_used, clippy::expect_used)]

use clusterconf_core::PersistErrorKind;
use clusterconf_store::fs::{ensure_directory_tree, ensure_directory_tree_with_mode};
use std::fs;
use tempfile::TempDir;

mod common;

#[test]
fn test_materialize_twice_same_structure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("cfg").join("a").join("b");

    ensure_directory_tree(&path).unwrap();
    let first = common::entry_names(&temp_dir.path().join("cfg"));

    ensure_directory_tree(&path).unwrap();
    let second = common::entry_names(&temp_dir.path().join("cfg"));

    assert_eq!(first, second);
    assert!(path.is_dir());
}

#[test]
fn test_collision_stops_at_offending_component() {
    let temp_dir = TempDir::new().unwrap();
    let cfg = temp_dir.path().join("cfg");
    fs::create_dir(&cfg).unwrap();
    let blocker = cfg.join("current");
    fs::write(&blocker, b"legacy single-file config").unwrap();

    let err = ensure_directory_tree(blocker.join("deeper").join("deepest")).unwrap_err();

    assert_eq!(err.kind(), PersistErrorKind::DirectoryCreate);
    assert_eq!(err.path(), blocker.as_path());
    assert!(err.message().starts_with(&blocker.display().to_string()));
    assert!(blocker.is_file());
    assert_eq!(common::entry_names(&cfg).len(), 1);
}

#[test]
fn test_existing_prefix_is_reused() {
    let temp_dir = TempDir::new().unwrap();
    let existing = temp_dir.path().join("existing");
    fs::create_dir(&existing).unwrap();
    fs::write(existing.join("keep.txt"), b"keep").unwrap();

    ensure_directory_tree(existing.join("new")).unwrap();

    assert_eq!(fs::read(existing.join("keep.txt")).unwrap(), b"keep");
    assert!(existing.join("new").is_dir());
}

#[test]
fn test_symlink_to_directory_is_accepted() {
    let temp_dir = TempDir::new().unwrap();
    let real = temp_dir.path().join("real");
    fs::create_dir(&real).unwrap();
    let link = temp_dir.path().join("link");
    #[cfg(unix)]
    std::os::unix::fs::symlink(&real, &link).unwrap();
    #[cfg(not(unix))]
    fs::create_dir(&link).unwrap();

    ensure_directory_tree(link.join("child")).unwrap();

    assert!(link.join("child").is_dir());
}

#[cfg(unix)]
#[test]
fn test_created_directories_are_traversable() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("moded");

    ensure_directory_tree_with_mode(&path, 0o755).unwrap();

    let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
    assert_eq!(mode & 0o700, 0o700, "owner has full access, got {:o}", mode);
    assert_eq!(mode & 0o022, 0, "group/other cannot write, got {:o}", mode);
}
