#![allow(clippy::unwrap_used, clippy::expect_used)]

use clusterconf_core::{ConfigError, PersistOptions, ShortWritePolicy};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_load_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persist.toml");
    fs::write(
        &path,
        "max_sections = 100\nshort_write = \"lenient\"\nkeep_backup = true\n",
    )
    .unwrap();

    let options = PersistOptions::load(&path).unwrap();

    assert_eq!(options.max_sections, Some(100));
    assert_eq!(options.short_write, ShortWritePolicy::Lenient);
    assert!(options.keep_backup);
    // untouched fields keep their defaults
    assert_eq!(options.dir_mode, 0o755);
    assert!(options.sync);
}

#[test]
fn test_load_missing_file_names_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = PersistOptions::load(&path).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn test_load_rejects_bad_policy() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("persist.toml");
    fs::write(&path, "short_write = \"sometimes\"\n").unwrap();

    let err = PersistOptions::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_builders_compose() {
    let options = PersistOptions::default()
        .with_max_sections(2)
        .with_short_write(ShortWritePolicy::Lenient)
        .with_sync(false)
        .with_keep_backup(true);

    assert!(options.validate().is_ok());
    assert_eq!(options.max_sections, Some(2));
    assert!(!options.sync);
}
