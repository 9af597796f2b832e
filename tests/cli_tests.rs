//! CLI integration tests using the REAL rprov binary

mod common;

use common::rprov_cmd;
use predicates::prelude::*;

#[test]
fn test_help_output() {
    rprov_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("architecture-segregated"))
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("verify"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("env"));
}

#[test]
fn test_install_help_shows_examples() {
    rprov_cmd()
        .args(["install", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("EXAMPLES"));
}

#[test]
fn test_version_output() {
    rprov_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("rprov"))
        .stdout(predicate::str::contains("Build info"));
}

#[test]
fn test_completions_bash() {
    rprov_cmd()
        .args(["completions", "--shell", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rprov"));
}

#[test]
fn test_install_missing_packages_file() {
    rprov_cmd()
        .args(["install", "/nonexistent/packages.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Packages file not found"));
}

#[test]
fn test_verify_missing_packages_file() {
    rprov_cmd()
        .args(["verify", "/nonexistent/packages.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Packages file not found"));
}

#[test]
fn test_unknown_subcommand_fails() {
    rprov_cmd().arg("frobnicate").assert().failure();
}

#[cfg(unix)]
#[test]
fn test_install_aborts_before_any_side_effect_without_interpreter() {
    let temp = tempfile::TempDir::new().unwrap();
    let packages = common::write_packages_file(&temp, "dplyr\nnx10/httpgd\n");
    let empty_bin = temp.path().join("bin");
    std::fs::create_dir_all(&empty_bin).unwrap();
    let library_root = temp.path().join("lib");

    rprov_cmd()
        .env("PATH", &empty_bin)
        .args(["--library-root"])
        .arg(&library_root)
        .arg("install")
        .arg(&packages)
        .assert()
        .failure()
        .stderr(predicate::str::contains("R interpreter not found"));

    // Detection fails before the library tree is touched
    assert!(!library_root.exists());
}

#[test]
#[ignore = "Requires an R installation with Rscript on PATH"]
fn test_env_output() {
    rprov_cmd()
        .arg("env")
        .assert()
        .success()
        .stdout(predicate::str::contains("R version:"))
        .stdout(predicate::str::contains("Architecture:"));
}

#[test]
#[ignore = "Requires an R installation and network access to CRAN"]
fn test_install_real_package() {
    let temp = tempfile::TempDir::new().unwrap();
    let packages = common::write_packages_file(&temp, "jsonlite\n");

    rprov_cmd()
        .args(["--library-root"])
        .arg(temp.path().join("lib"))
        .arg("install")
        .arg(&packages)
        .assert()
        .success()
        .stdout(predicate::str::contains("All requested packages are present"));
}
