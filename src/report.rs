//! Run summary and final report rendering
//!
//! Aggregates per-package outcomes and verification results into a
//! `RunSummary`, renders it for humans (or as JSON for pipelines), and
//! derives the process exit status. Every failed identifier is enumerated by
//! name; a failure is never silently swallowed.

use std::time::Duration;

use console::Style;
use serde::Serialize;

use crate::executor::{InstallationOutcome, OutcomeStatus};
use crate::verify::Verification;

/// One failed attempt, kept in first-failure order
#[derive(Debug, Clone, Serialize)]
pub struct FailedPackage {
    pub identifier: String,
    pub diagnostic: Option<String>,
}

/// Aggregate over all outcomes of one run
///
/// Invariant: `installed_count + already_satisfied_count + failed_count`
/// equals the number of specs processed.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub installed_count: usize,
    pub already_satisfied_count: usize,
    pub failed_count: usize,
    pub failed: Vec<FailedPackage>,
    /// Requested identifiers the verification pass could not load, including
    /// ones the executor recorded as installed
    pub missing_after_verify: Vec<String>,
    pub total_duration_seconds: f64,
}

impl RunSummary {
    /// Exit status 0 iff nothing failed and verification found everything
    pub fn is_success(&self) -> bool {
        self.failed_count == 0 && self.missing_after_verify.is_empty()
    }
}

/// Build the summary from executor outcomes and the verification pass
pub fn summarize(
    outcomes: &[InstallationOutcome],
    verification: &Verification,
    total_duration: Duration,
) -> RunSummary {
    let mut installed_count = 0;
    let mut already_satisfied_count = 0;
    let mut failed = Vec::new();

    for outcome in outcomes {
        match outcome.status {
            OutcomeStatus::Installed => installed_count += 1,
            OutcomeStatus::AlreadySatisfied => already_satisfied_count += 1,
            OutcomeStatus::Failed => failed.push(FailedPackage {
                identifier: outcome.identifier.clone(),
                diagnostic: outcome.diagnostic.clone(),
            }),
        }
    }

    RunSummary {
        installed_count,
        already_satisfied_count,
        failed_count: failed.len(),
        failed,
        missing_after_verify: verification.missing(),
        total_duration_seconds: total_duration.as_secs_f64(),
    }
}

/// Render the human-readable report
///
/// Diagnostics are shown per failed package in debug mode; normal mode keeps
/// the terse one-line-per-failure form.
pub fn render(summary: &RunSummary, debug: bool) {
    let bold = Style::new().bold();
    let green = Style::new().green();
    let yellow = Style::new().yellow();
    let red = Style::new().red().bold();

    println!();
    println!("{}", bold.apply_to("Provisioning summary"));
    println!(
        "  {} installed, {} already present, {} failed ({:.1}s)",
        green.apply_to(summary.installed_count),
        yellow.apply_to(summary.already_satisfied_count),
        red.apply_to(summary.failed_count),
        summary.total_duration_seconds,
    );

    if !summary.failed.is_empty() {
        println!();
        println!("{}", red.apply_to("Failed:"));
        for failure in &summary.failed {
            println!("  {}", failure.identifier);
            if debug {
                if let Some(ref diagnostic) = failure.diagnostic {
                    for line in diagnostic.lines() {
                        println!("    {line}");
                    }
                }
            }
        }
    }

    if !summary.missing_after_verify.is_empty() {
        println!();
        println!("{}", red.apply_to("Missing after verification:"));
        for identifier in &summary.missing_after_verify {
            println!("  {identifier}");
        }
    }

    if summary.is_success() {
        println!();
        println!("{}", green.apply_to("All requested packages are present."));
    }
}
