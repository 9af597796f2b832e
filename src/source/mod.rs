//! Package source classification
//!
//! This module provides the `SourceKind` enum and `PackageSpec` type for
//! classifying requested package identifiers by their lexical shape alone.
//! Classification never touches the network and never fails: an identifier
//! that looks like nothing in particular is optimistically treated as a CRAN
//! name and allowed to fail later during installation, which produces a
//! clearer, package-manager-native error than client-side validation would.

use serde::{Deserialize, Serialize};

/// Where a requested package comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// A bare CRAN package name, resolved against the central repository
    Cran,
    /// An `owner/repo` shorthand resolved against a code-hosting service
    VcsReference,
    /// A direct URL to a source archive (e.g. a CRAN-archive tarball)
    ArchiveUrl,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            SourceKind::Cran => "cran",
            SourceKind::VcsReference => "vcs",
            SourceKind::ArchiveUrl => "url",
        }
    }
}

/// One requested unit of installation
///
/// Constructed once when the input list is parsed; immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSpec {
    /// The identifier exactly as it appeared in the package list
    pub identifier: String,
    /// Source kind, a pure function of the identifier's lexical shape
    pub kind: SourceKind,
}

impl PackageSpec {
    /// Classify an identifier into a `PackageSpec`
    ///
    /// Rules, first match wins:
    /// 1. Contains `://` (a URL scheme) - archive URL
    /// 2. Shape `<non-slash>+/<non-slash>+` with no scheme - VCS reference
    /// 3. Anything else - CRAN name, taken verbatim
    ///
    /// Total and permissive: every non-empty identifier classifies. Blank
    /// and whitespace-only entries are dropped upstream by the manifest
    /// parser and never reach this function.
    pub fn classify(identifier: &str) -> Self {
        let identifier = identifier.trim();

        let kind = if identifier.contains("://") {
            SourceKind::ArchiveUrl
        } else if is_owner_repo(identifier) {
            SourceKind::VcsReference
        } else {
            SourceKind::Cran
        };

        PackageSpec {
            identifier: identifier.to_string(),
            kind,
        }
    }

    /// The R package name this identifier installs
    ///
    /// The idempotence pre-check and the verification pass query the library
    /// by package name, which differs from the identifier for VCS references
    /// (the repo part) and archive URLs (the tarball stem before the version
    /// separator).
    pub fn package_name(&self) -> String {
        match self.kind {
            SourceKind::Cran => self.identifier.clone(),
            SourceKind::VcsReference => {
                let repo = self
                    .identifier
                    .rsplit('/')
                    .next()
                    .unwrap_or(&self.identifier);
                // Strip a pinned ref (owner/repo@v1.0) or subdir fragment
                repo.split(['@', '#']).next().unwrap_or(repo).to_string()
            }
            SourceKind::ArchiveUrl => {
                let file = self
                    .identifier
                    .rsplit('/')
                    .next()
                    .unwrap_or(&self.identifier);
                let file = file.split('?').next().unwrap_or(file);
                // mcmcplots_0.4.3.tar.gz -> mcmcplots
                let stem = file.split('_').next().unwrap_or(file);
                stem.trim_end_matches(".tar.gz")
                    .trim_end_matches(".tgz")
                    .trim_end_matches(".zip")
                    .to_string()
            }
        }
    }
}

/// Check for the `owner/repo` shape: exactly one separator, both sides non-empty
fn is_owner_repo(identifier: &str) -> bool {
    let mut parts = identifier.split('/');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(owner), Some(repo), None) => !owner.is_empty() && !repo.is_empty(),
        _ => false,
    }
}
