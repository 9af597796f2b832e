//! Verify command implementation
//!
//! Standalone verification pass against an existing library, for post-hoc
//! auditing of a built image. Shares the install command's exit contract:
//! non-zero iff anything requested is missing.

use std::path::Path;

use console::Style;

use crate::cli::VerifyArgs;
use crate::env::EnvironmentDescriptor;
use crate::error::{Result, RprovError};
use crate::manifest;
use crate::pm::rscript::RscriptManager;
use crate::verify;

/// Run the verify command
pub fn run(library_root: &Path, args: &VerifyArgs) -> Result<()> {
    let specs = manifest::load(&args.packages_file)?;

    let descriptor = EnvironmentDescriptor::detect()?;
    let library = descriptor.library_dir(library_root);
    if !library.is_dir() {
        return Err(RprovError::LibraryNotFound {
            path: library.display().to_string(),
        });
    }

    let pm = RscriptManager::new(&descriptor);
    let verification = verify::verify(&pm, &specs, &library);

    let green = Style::new().green();
    let red = Style::new().red().bold();

    for (identifier, present) in verification.entries() {
        if *present {
            println!("{} {}", green.apply_to("ok"), identifier);
        } else {
            println!("{} {}", red.apply_to("MISSING"), identifier);
        }
    }

    if verification.all_present() {
        println!(
            "\n{}",
            green.apply_to(format!("All {} packages present.", specs.len()))
        );
        return Ok(());
    }

    let missing = verification.missing();
    for identifier in &missing {
        eprintln!(
            "{}",
            RprovError::VerificationMismatch {
                identifier: identifier.clone()
            }
        );
    }

    Err(RprovError::ProvisioningIncomplete {
        failed: 0,
        missing: missing.len(),
    })
}
