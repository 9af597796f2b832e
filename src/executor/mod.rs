//! Installation executor
//!
//! Turns an ordered list of `PackageSpec`s into one terminal
//! `InstallationOutcome` per spec. CRAN-kind specs that are not already
//! satisfied go to the package manager as a single batch call so it can
//! compute a shared dependency resolution; VCS and archive-URL specs are
//! installed one at a time with per-item failure isolation. A single bad
//! package never prevents the remaining packages from being attempted.
//!
//! Every spec is pre-checked for presence before any installer invocation,
//! which makes re-running after a partial prior failure safe: satisfied
//! specs are recorded as `AlreadySatisfied` with zero installer calls.

use std::path::Path;
use std::time::{Duration, Instant};

use serde::Serialize;

use crate::pm::PackageManager;
use crate::progress::ProgressDisplay;
use crate::source::{PackageSpec, SourceKind};

/// Terminal status of one installation attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeStatus {
    /// Present and loadable before any attempt; the installer was not invoked
    AlreadySatisfied,
    /// Newly installed by this run
    Installed,
    /// Attempted and failed; the run continued past it
    Failed,
}

/// Result of attempting one `PackageSpec`
///
/// Created when an attempt completes and read-only afterward. CRAN-kind
/// outcomes share the batch call's wall-clock duration and diagnostic.
#[derive(Debug, Clone, Serialize)]
pub struct InstallationOutcome {
    pub identifier: String,
    pub status: OutcomeStatus,
    pub duration: Duration,
    /// Message captured from the package manager; present on failure
    pub diagnostic: Option<String>,
}

impl InstallationOutcome {
    fn already_satisfied(spec: &PackageSpec, duration: Duration) -> Self {
        InstallationOutcome {
            identifier: spec.identifier.clone(),
            status: OutcomeStatus::AlreadySatisfied,
            duration,
            diagnostic: None,
        }
    }

    fn installed(spec: &PackageSpec, duration: Duration) -> Self {
        InstallationOutcome {
            identifier: spec.identifier.clone(),
            status: OutcomeStatus::Installed,
            duration,
            diagnostic: None,
        }
    }

    fn failed(spec: &PackageSpec, duration: Duration, diagnostic: String) -> Self {
        InstallationOutcome {
            identifier: spec.identifier.clone(),
            status: OutcomeStatus::Failed,
            duration,
            diagnostic: Some(diagnostic),
        }
    }
}

/// Sequential installation executor
pub struct Executor<'a, P: PackageManager> {
    pm: &'a P,
    library: &'a Path,
    debug: bool,
}

impl<'a, P: PackageManager> Executor<'a, P> {
    pub fn new(pm: &'a P, library: &'a Path, debug: bool) -> Self {
        Executor { pm, library, debug }
    }

    /// Process every spec exactly once, returning outcomes in submission
    /// order
    ///
    /// CRAN-kind specs are reordered ahead of individually-installed specs to
    /// form one batch; their outcomes are still reported at their original
    /// positions.
    pub fn execute(&self, specs: &[PackageSpec]) -> Vec<InstallationOutcome> {
        let mut outcomes: Vec<Option<InstallationOutcome>> =
            specs.iter().map(|_| None).collect();

        let mut batch_indices: Vec<usize> = Vec::new();
        let mut individual_indices: Vec<usize> = Vec::new();

        // Idempotence pre-check: a presence query failure is treated as
        // absent and the install is attempted anyway.
        for (i, spec) in specs.iter().enumerate() {
            let started = Instant::now();
            let present = self
                .pm
                .is_installed_and_loadable(&spec.package_name(), self.library)
                .unwrap_or(false);
            if present {
                outcomes[i] = Some(InstallationOutcome::already_satisfied(
                    spec,
                    started.elapsed(),
                ));
            } else {
                match spec.kind {
                    SourceKind::Cran => batch_indices.push(i),
                    SourceKind::VcsReference | SourceKind::ArchiveUrl => {
                        individual_indices.push(i);
                    }
                }
            }
        }

        if !batch_indices.is_empty() {
            self.run_batch(specs, &batch_indices, &mut outcomes);
        }

        self.run_individuals(specs, &individual_indices, &mut outcomes);

        // Every index was filled above; the fallback is unreachable but keeps
        // the invariant explicit without panicking.
        specs
            .iter()
            .zip(outcomes)
            .map(|(spec, outcome)| {
                outcome.unwrap_or_else(|| {
                    InstallationOutcome::failed(
                        spec,
                        Duration::ZERO,
                        "no attempt recorded".to_string(),
                    )
                })
            })
            .collect()
    }

    fn run_batch(
        &self,
        specs: &[PackageSpec],
        indices: &[usize],
        outcomes: &mut [Option<InstallationOutcome>],
    ) {
        let names: Vec<String> = indices.iter().map(|&i| specs[i].identifier.clone()).collect();

        let started = Instant::now();
        let result = self.pm.batch_install(&names, self.library, self.debug);
        let duration = started.elapsed();

        // pak reports only an aggregate result: on failure the whole batch
        // is marked Failed as a group, carrying the aggregate diagnostic.
        for &i in indices {
            outcomes[i] = Some(match &result {
                Ok(()) => InstallationOutcome::installed(&specs[i], duration),
                Err(e) => InstallationOutcome::failed(&specs[i], duration, e.to_string()),
            });
        }
    }

    fn run_individuals(
        &self,
        specs: &[PackageSpec],
        indices: &[usize],
        outcomes: &mut [Option<InstallationOutcome>],
    ) {
        let progress = ProgressDisplay::new(indices.len() as u64, self.debug);

        for &i in indices {
            let spec = &specs[i];
            progress.update(&spec.identifier);

            let started = Instant::now();
            let result = match spec.kind {
                SourceKind::VcsReference => {
                    self.pm
                        .install_from_reference(&spec.identifier, self.library, self.debug)
                }
                SourceKind::ArchiveUrl => {
                    self.pm
                        .install_from_url(&spec.identifier, self.library, self.debug)
                }
                // CRAN specs never reach here; they are batched above
                SourceKind::Cran => Ok(()),
            };

            outcomes[i] = Some(match result {
                Ok(()) => InstallationOutcome::installed(spec, started.elapsed()),
                Err(e) => InstallationOutcome::failed(spec, started.elapsed(), e.to_string()),
            });
            progress.inc();
        }

        progress.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pm::mock::MockManager;
    use std::path::PathBuf;

    fn lib() -> PathBuf {
        PathBuf::from("/opt/r/site-library/4.5-amd64")
    }

    fn specs(identifiers: &[&str]) -> Vec<PackageSpec> {
        identifiers
            .iter()
            .map(|i| PackageSpec::classify(i))
            .collect()
    }

    fn statuses(outcomes: &[InstallationOutcome]) -> Vec<OutcomeStatus> {
        outcomes.iter().map(|o| o.status).collect()
    }

    #[test]
    fn test_already_present_skips_installer() {
        let pm = MockManager::with_installed(&["dplyr", "ggplot2"]);
        let specs = specs(&["dplyr", "ggplot2"]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        assert_eq!(
            statuses(&outcomes),
            vec![
                OutcomeStatus::AlreadySatisfied,
                OutcomeStatus::AlreadySatisfied
            ]
        );
        assert_eq!(pm.install_calls(), 0);
    }

    #[test]
    fn test_cran_specs_form_one_batch() {
        let pm = MockManager::default();
        let specs = specs(&["dplyr", "nx10/httpgd", "ggplot2"]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        assert!(outcomes.iter().all(|o| o.status == OutcomeStatus::Installed));
        let calls = pm.calls.borrow();
        let batches: Vec<_> = calls.iter().filter(|c| c.starts_with("batch")).collect();
        assert_eq!(batches.len(), 1);
        assert!(batches[0].contains("dplyr") && batches[0].contains("ggplot2"));
        assert!(!batches[0].contains("httpgd"));
    }

    #[test]
    fn test_outcomes_in_submission_order() {
        let pm = MockManager::default();
        let specs = specs(&["zoo", "nx10/httpgd", "abind"]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        let ids: Vec<_> = outcomes.iter().map(|o| o.identifier.as_str()).collect();
        assert_eq!(ids, vec!["zoo", "nx10/httpgd", "abind"]);
    }

    #[test]
    fn test_individual_failure_is_isolated() {
        let pm = MockManager::default().failing_on(&["bad/package"]);
        let specs = specs(&[
            "bad/package",
            "good/package",
            "https://example.org/pkg_1.0.tar.gz",
        ]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        assert_eq!(
            statuses(&outcomes),
            vec![
                OutcomeStatus::Failed,
                OutcomeStatus::Installed,
                OutcomeStatus::Installed
            ]
        );
        assert!(outcomes[0].diagnostic.is_some());
    }

    #[test]
    fn test_batch_failure_marks_group_failed() {
        let pm = MockManager::default().failing_on(&["dplyr"]);
        let specs = specs(&["dplyr", "ggplot2", "nx10/httpgd"]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        // Aggregate batch failure marks every CRAN spec Failed...
        assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
        assert_eq!(outcomes[1].status, OutcomeStatus::Failed);
        // ...but does not abort specs of other kinds
        assert_eq!(outcomes[2].status, OutcomeStatus::Installed);
    }

    #[test]
    fn test_batch_failure_does_not_stop_individuals() {
        let pm = MockManager::default().failing_on(&["broken"]);
        let specs = specs(&["broken", "owner/tool"]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        assert_eq!(outcomes[0].status, OutcomeStatus::Failed);
        assert_eq!(outcomes[1].status, OutcomeStatus::Installed);
        assert!(pm.calls.borrow().iter().any(|c| c == "ref owner/tool"));
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let pm = MockManager::default();
        let specs = specs(&["dplyr", "nx10/httpgd"]);
        let lib = lib();
        let executor = Executor::new(&pm, &lib, false);

        let first = executor.execute(&specs);
        assert!(first.iter().all(|o| o.status == OutcomeStatus::Installed));
        let installs_after_first = pm.install_calls();

        let second = executor.execute(&specs);
        assert!(
            second
                .iter()
                .all(|o| o.status == OutcomeStatus::AlreadySatisfied)
        );
        assert_eq!(pm.install_calls(), installs_after_first);
    }

    #[test]
    fn test_every_spec_gets_exactly_one_outcome() {
        let pm = MockManager::with_installed(&["zoo"]).failing_on(&["bad/one"]);
        let specs = specs(&[
            "zoo",
            "dplyr",
            "bad/one",
            "https://example.org/pkg_2.0.tar.gz",
        ]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        assert_eq!(outcomes.len(), specs.len());
        let installed = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Installed)
            .count();
        let already = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::AlreadySatisfied)
            .count();
        let failed = outcomes
            .iter()
            .filter(|o| o.status == OutcomeStatus::Failed)
            .count();
        assert_eq!(installed + already + failed, specs.len());
    }

    #[test]
    fn test_empty_spec_list() {
        let pm = MockManager::default();
        let lib = lib();
        let outcomes = Executor::new(&pm, &lib, false).execute(&[]);
        assert!(outcomes.is_empty());
        assert_eq!(pm.install_calls(), 0);
    }

    #[test]
    fn test_url_spec_installs_individually() {
        let pm = MockManager::default();
        let specs = specs(&[
            "https://cran.r-project.org/src/contrib/Archive/mcmcplots/mcmcplots_0.4.3.tar.gz",
        ]);
        let lib = lib();

        let outcomes = Executor::new(&pm, &lib, false).execute(&specs);

        assert_eq!(outcomes[0].status, OutcomeStatus::Installed);
        assert!(pm.calls.borrow().iter().any(|c| c.starts_with("url ")));
        assert!(pm.installed.borrow().contains("mcmcplots"));
    }
}
