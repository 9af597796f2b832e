//! Error types and handling for rprov
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! The taxonomy follows the run lifecycle: environment and bootstrap errors
//! are fatal and abort before any package-level work; per-package failures
//! are contained by the executor (converted into `Failed` outcomes) and only
//! surface here as the final `ProvisioningIncomplete` exit.

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for rprov operations
#[derive(Error, Diagnostic, Debug)]
pub enum RprovError {
    // Package list errors
    #[error("Packages file not found: {path}")]
    #[diagnostic(
        code(rprov::manifest::not_found),
        help("Pass the path to a newline-delimited package list, e.g. rprov install /tmp/packages.txt")
    )]
    PackagesFileNotFound { path: String },

    #[error("Failed to read packages file: {path}")]
    #[diagnostic(code(rprov::manifest::read_failed))]
    PackagesFileRead { path: String, reason: String },

    // Environment probe errors (fatal before any side effect)
    #[error("R interpreter not found on PATH")]
    #[diagnostic(
        code(rprov::env::interpreter_not_found),
        help("Install R and make sure the Rscript binary is on PATH")
    )]
    InterpreterNotFound,

    #[error("Failed to detect R environment: {reason}")]
    #[diagnostic(
        code(rprov::env::detection_failed),
        help("An unknown destination risks installing into the wrong architecture's library tree")
    )]
    EnvironmentDetection { reason: String },

    #[error("Unsupported CPU architecture: {arch}")]
    #[diagnostic(
        code(rprov::env::unsupported_arch),
        help("Supported architectures: x86_64 (amd64), aarch64 (arm64)")
    )]
    UnsupportedArchitecture { arch: String },

    #[error("Failed to create library directory: {path}")]
    #[diagnostic(code(rprov::env::library_create_failed))]
    LibraryCreateFailed { path: String, reason: String },

    #[error("Library directory not found: {path}")]
    #[diagnostic(
        code(rprov::env::library_not_found),
        help("Run 'rprov install' to provision the library first")
    )]
    LibraryNotFound { path: String },

    // Package manager bootstrap (fatal before any package-level work)
    #[error("Failed to bootstrap the pak package manager: {reason}")]
    #[diagnostic(
        code(rprov::pm::bootstrap_failed),
        help("Check network access to r-lib.github.io and that R can write to its default library")
    )]
    BootstrapFailed { reason: String },

    // Installer invocation errors (contained per package by the executor)
    #[error("Failed to invoke the R installer: {reason}")]
    #[diagnostic(code(rprov::pm::invocation_failed))]
    InstallerInvocation { reason: String },

    #[error("Installation failed for '{identifier}': {diagnostic}")]
    #[diagnostic(code(rprov::pm::install_failed))]
    InstallationFailed {
        identifier: String,
        diagnostic: String,
    },

    // Verification errors
    #[error("Package '{identifier}' is not loadable after installation")]
    #[diagnostic(
        code(rprov::verify::mismatch),
        help("The package may have installed but failed to load due to missing system libraries")
    )]
    VerificationMismatch { identifier: String },

    // Final run status
    #[error("Provisioning incomplete: {failed} failed, {missing} missing after verification")]
    #[diagnostic(
        code(rprov::run::incomplete),
        help("Re-running is safe: already-installed packages are skipped")
    )]
    ProvisioningIncomplete { failed: usize, missing: usize },

    #[error("Failed to encode run summary: {reason}")]
    #[diagnostic(code(rprov::report::encode_failed))]
    ReportEncode { reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(rprov::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for RprovError {
    fn from(err: std::io::Error) -> Self {
        RprovError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RprovError {
    fn from(err: serde_json::Error) -> Self {
        RprovError::ReportEncode {
            reason: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RprovError>;
