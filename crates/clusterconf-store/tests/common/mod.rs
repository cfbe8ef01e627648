#![allow(dead_code)]

use clusterconf_core::Section;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Scratch root with a target path and a staging path beside it
pub struct Env {
    pub root: TempDir,
    pub target: PathBuf,
    pub staging: PathBuf,
}

pub fn setup_env() -> Env {
    let root = TempDir::new().unwrap();
    let target = root.path().join("cfg").join("current");
    let staging = root.path().join("cfg").join(".stage-x7f2");
    Env {
        root,
        target,
        staging,
    }
}

pub fn sections(pairs: &[(&str, &str)]) -> Vec<Section> {
    pairs
        .iter()
        .map(|(name, content)| Section::new(*name, *content))
        .collect()
}

/// Names of regular files directly inside `dir`
pub fn file_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect()
}

/// Everything in `dir`, files and directories
pub fn entry_names(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.file_name().to_str().map(str::to_string))
        .collect()
}
