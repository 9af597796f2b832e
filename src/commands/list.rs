//! List command implementation

use std::path::Path;

use console::Style;

use crate::env::EnvironmentDescriptor;
use crate::error::{Result, RprovError};

/// List packages present in the destination library
///
/// Each installed R package occupies one directory under the library root;
/// directory names are package names.
pub fn run(library_root: &Path) -> Result<()> {
    let descriptor = EnvironmentDescriptor::detect()?;
    let library = descriptor.library_dir(library_root);

    if !library.is_dir() {
        return Err(RprovError::LibraryNotFound {
            path: library.display().to_string(),
        });
    }

    let mut names: Vec<String> = std::fs::read_dir(&library)?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_dir())
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    println!(
        "{} ({} packages)",
        Style::new().bold().apply_to(library.display()),
        names.len()
    );
    for name in names {
        println!("  {name}");
    }

    Ok(())
}
