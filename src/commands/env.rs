//! Env command implementation

use std::path::Path;

use console::Style;

use crate::env::{COMPAT_LINK, EnvironmentDescriptor};
use crate::error::Result;

/// Print the probed environment and the resulting library layout
pub fn run(library_root: &Path) -> Result<()> {
    let descriptor = EnvironmentDescriptor::detect()?;
    let bold = Style::new().bold();

    println!(
        "{} {}",
        bold.apply_to("R version:"),
        descriptor.interpreter_version
    );
    println!(
        "{} {}",
        bold.apply_to("Architecture:"),
        descriptor.architecture_tag
    );
    println!(
        "{} {}",
        bold.apply_to("Rscript:"),
        descriptor.rscript.display()
    );
    println!(
        "{} {}",
        bold.apply_to("Library:"),
        descriptor.library_dir(library_root).display()
    );
    println!(
        "{} {}",
        bold.apply_to("Compat link:"),
        library_root.join(COMPAT_LINK).display()
    );

    Ok(())
}
