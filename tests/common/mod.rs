//! Shared helpers for integration tests

use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated)]
pub fn rprov_cmd() -> Command {
    Command::cargo_bin("rprov").unwrap()
}

/// Write a packages file into `dir` and return its path
#[allow(dead_code)]
pub fn write_packages_file(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("packages.txt");
    std::fs::write(&path, contents).unwrap();
    path
}
