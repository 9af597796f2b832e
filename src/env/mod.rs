//! Environment probe and library path layout
//!
//! Detects the R interpreter version and target CPU architecture once at
//! startup, before any installation attempt. Both values feed the
//! architecture-segregated destination path `<root>/<version>-<arch>/` so
//! binaries built for one platform are never loaded on another. Detection
//! failure is fatal: an unknown destination silently pollutes the wrong
//! library tree, which is worse than no run at all.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::error::{Result, RprovError};

/// Conventional symlink name pointing at the architecture-specific directory
///
/// Downstream consumers load packages through `<root>/current` regardless of
/// which architecture built the image.
pub const COMPAT_LINK: &str = "current";

/// Probe output: interpreter version and architecture tag
///
/// Computed once per run and passed explicitly into the executor and the
/// verification pass; never re-read from the ambient process environment.
#[derive(Debug, Clone, Serialize)]
pub struct EnvironmentDescriptor {
    /// R major.minor, e.g. "4.5"
    pub interpreter_version: String,
    /// Container-style architecture tag, e.g. "amd64" or "arm64"
    pub architecture_tag: String,
    /// Resolved path to the Rscript binary
    #[serde(skip)]
    pub rscript: PathBuf,
}

impl EnvironmentDescriptor {
    /// Detect the runtime environment, failing fast when either value is
    /// undeterminable
    pub fn detect() -> Result<Self> {
        let rscript = which::which("Rscript").map_err(|_| RprovError::InterpreterNotFound)?;

        let output = Command::new(&rscript)
            .args([
                "--vanilla",
                "-e",
                "cat(R.version$major, R.version$minor, sep = \".\")",
            ])
            .output()
            .map_err(|e| RprovError::EnvironmentDetection {
                reason: format!("failed to run Rscript: {e}"),
            })?;

        if !output.status.success() {
            return Err(RprovError::EnvironmentDetection {
                reason: format!("Rscript exited with {}", output.status),
            });
        }

        let raw = String::from_utf8_lossy(&output.stdout);
        let interpreter_version =
            major_minor(raw.trim()).ok_or_else(|| RprovError::EnvironmentDetection {
                reason: format!("unparseable R version string: '{}'", raw.trim()),
            })?;

        let architecture_tag = arch_tag(std::env::consts::ARCH)
            .ok_or_else(|| RprovError::UnsupportedArchitecture {
                arch: std::env::consts::ARCH.to_string(),
            })?
            .to_string();

        Ok(EnvironmentDescriptor {
            interpreter_version,
            architecture_tag,
            rscript,
        })
    }

    /// The architecture-segregated library directory under `root`
    pub fn library_dir(&self, root: &Path) -> PathBuf {
        root.join(format!(
            "{}-{}",
            self.interpreter_version, self.architecture_tag
        ))
    }
}

/// Create the library directory and refresh the `current` compatibility link
pub fn prepare_library(root: &Path, env: &EnvironmentDescriptor) -> Result<PathBuf> {
    let library = env.library_dir(root);

    std::fs::create_dir_all(&library).map_err(|e| RprovError::LibraryCreateFailed {
        path: library.display().to_string(),
        reason: e.to_string(),
    })?;

    refresh_compat_link(root, &library)?;

    Ok(library)
}

#[cfg(unix)]
fn refresh_compat_link(root: &Path, library: &Path) -> Result<()> {
    let link = root.join(COMPAT_LINK);
    if std::fs::symlink_metadata(&link).is_ok() {
        std::fs::remove_file(&link)?;
    }
    std::os::unix::fs::symlink(library, &link)?;
    Ok(())
}

#[cfg(not(unix))]
fn refresh_compat_link(_root: &Path, _library: &Path) -> Result<()> {
    Ok(())
}

/// Reduce a full version string ("4.5.1") to major.minor ("4.5")
fn major_minor(version: &str) -> Option<String> {
    let mut parts = version.split('.');
    let major = parts.next().filter(|p| !p.is_empty())?;
    let minor = parts.next().filter(|p| !p.is_empty())?;
    if major.chars().all(|c| c.is_ascii_digit()) && minor.chars().all(|c| c.is_ascii_digit()) {
        Some(format!("{major}.{minor}"))
    } else {
        None
    }
}

/// Map a Rust target arch to the container-style tag used in library paths
fn arch_tag(arch: &str) -> Option<&'static str> {
    match arch {
        "x86_64" => Some("amd64"),
        "aarch64" => Some("arm64"),
        _ => None,
    }
}
