//! Package manager abstraction
//!
//! The executor and verification pass depend only on this trait, never on
//! the text output of the underlying tool. The production implementation
//! ([`rscript::RscriptManager`]) shells out to Rscript and the `pak` package
//! manager; tests substitute a scripted mock.

use std::path::Path;

use crate::error::Result;

pub mod rscript;

/// The four call shapes rprov needs from an R package manager
pub trait PackageManager {
    /// Install a set of CRAN names in one request, letting the package
    /// manager compute a shared dependency resolution across all of them.
    ///
    /// An `Err` means the batch failed as a whole; pak reports only an
    /// aggregate result, so the caller attributes the failure to every name
    /// in the batch.
    fn batch_install(&self, names: &[String], library: &Path, debug: bool) -> Result<()>;

    /// Install one package from an `owner/repo` code-hosting reference
    fn install_from_reference(&self, reference: &str, library: &Path, debug: bool) -> Result<()>;

    /// Install one package from a direct source-archive URL
    fn install_from_url(&self, url: &str, library: &Path, debug: bool) -> Result<()>;

    /// Whether the named package is present and loadable at `library`
    fn is_installed_and_loadable(&self, name: &str, library: &Path) -> Result<bool>;
}
