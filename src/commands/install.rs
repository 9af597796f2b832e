//! Install command implementation
//!
//! The full run: probe the environment, parse the package list, execute the
//! installation plan, verify independently, and report. Control flow follows
//! the fail-fast policy: environment and bootstrap problems abort before any
//! package-level side effect, while per-package failures are contained and
//! surface only in the final summary and exit status.

use std::path::Path;
use std::time::Instant;

use console::Style;

use crate::cli::InstallArgs;
use crate::env::{self, EnvironmentDescriptor};
use crate::error::{Result, RprovError};
use crate::executor::Executor;
use crate::manifest;
use crate::pm::rscript::RscriptManager;
use crate::report;
use crate::source::PackageSpec;
use crate::verify;

/// Run the install command
pub fn run(library_root: &Path, debug: bool, args: &InstallArgs) -> Result<()> {
    let specs = manifest::load(&args.packages_file)?;

    if args.dry_run {
        print_plan(&specs);
        return Ok(());
    }

    if specs.is_empty() {
        println!("No packages requested in {}", args.packages_file.display());
        return Ok(());
    }

    let descriptor = EnvironmentDescriptor::detect()?;
    let library = env::prepare_library(library_root, &descriptor)?;

    let pm = RscriptManager::new(&descriptor);
    pm.ensure_pak(debug)?;

    println!(
        "Provisioning {} packages into {} (R {}, {})",
        specs.len(),
        library.display(),
        descriptor.interpreter_version,
        descriptor.architecture_tag,
    );

    let started = Instant::now();
    let outcomes = Executor::new(&pm, &library, debug).execute(&specs);
    let verification = verify::verify(&pm, &specs, &library);
    let summary = report::summarize(&outcomes, &verification, started.elapsed());

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        report::render(&summary, debug);
    }

    if summary.is_success() {
        Ok(())
    } else {
        Err(RprovError::ProvisioningIncomplete {
            failed: summary.failed_count,
            missing: summary.missing_after_verify.len(),
        })
    }
}

/// Print the classification plan without touching the environment
fn print_plan(specs: &[PackageSpec]) {
    let bold = Style::new().bold();
    let dim = Style::new().dim();

    println!(
        "{} ({} packages)",
        bold.apply_to("Installation plan"),
        specs.len()
    );
    for spec in specs {
        println!(
            "  {:4} {}  {}",
            dim.apply_to(spec.kind.label()),
            spec.identifier,
            dim.apply_to(format!("-> {}", spec.package_name())),
        );
    }
}
