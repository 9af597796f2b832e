//! Package list parsing
//!
//! The input is a newline-delimited list of package identifiers, the format
//! baked into provisioning images: one identifier per line, blank lines and
//! `#` comments ignored.

use std::path::Path;

use crate::error::{Result, RprovError};
use crate::source::PackageSpec;

/// Load and classify a packages file
///
/// Every surviving line is classified into a `PackageSpec`; classification is
/// total, so the only error paths are file-level.
pub fn load(path: &Path) -> Result<Vec<PackageSpec>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            RprovError::PackagesFileNotFound {
                path: path.display().to_string(),
            }
        } else {
            RprovError::PackagesFileRead {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    Ok(parse(&contents))
}

fn parse(contents: &str) -> Vec<PackageSpec> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(PackageSpec::classify)
        .collect()
}
