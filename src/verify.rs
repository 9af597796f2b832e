//! Post-install verification pass
//!
//! Independently re-queries every requested package instead of trusting the
//! executor's bookkeeping: a package can report installation success yet fail
//! to load due to missing system libraries. A package missing here fails the
//! run even when the executor recorded `Installed` for it.

use std::path::Path;

use crate::pm::PackageManager;
use crate::source::PackageSpec;

/// Per-identifier presence after the run, in request order
#[derive(Debug)]
pub struct Verification {
    entries: Vec<(String, bool)>,
}

impl Verification {
    pub fn entries(&self) -> &[(String, bool)] {
        &self.entries
    }

    /// Identifiers not present and loadable, in request order
    pub fn missing(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, present)| !present)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn all_present(&self) -> bool {
        self.entries.iter().all(|(_, present)| *present)
    }
}

/// Re-check that every requested package is present and loadable
///
/// A presence query that itself errors counts as missing; verification must
/// never report a package present on anything short of a positive answer.
pub fn verify<P: PackageManager>(pm: &P, specs: &[PackageSpec], library: &Path) -> Verification {
    let entries = specs
        .iter()
        .map(|spec| {
            let present = pm
                .is_installed_and_loadable(&spec.package_name(), library)
                .unwrap_or(false);
            (spec.identifier.clone(), present)
        })
        .collect();

    Verification { entries }
}
