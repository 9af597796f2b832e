//! CLI definitions using clap derive API

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Default location of the package list inside provisioning images
pub const DEFAULT_PACKAGES_FILE: &str = "/tmp/packages.txt";

/// Default root of the architecture-segregated library tree
pub const DEFAULT_LIBRARY_ROOT: &str = "/opt/r/site-library";

/// rprov - R package library provisioner
///
/// Turn a newline-delimited package list into a populated, verified,
/// architecture-segregated R library.
#[derive(Parser, Debug)]
#[command(
    name = "rprov",
    author,
    version,
    color = clap::ColorChoice::Always,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provisioner for architecture-segregated R package libraries",
    long_about = "rprov installs R packages from CRAN, code-hosting references (owner/repo) and \
                  direct archive URLs into an architecture-segregated library partitioned by \
                  interpreter version and CPU architecture. Individual failures are isolated and \
                  reported at the end; re-running after a partial failure is safe.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n    \
                  rprov install\n    \
                  rprov install ./packages.txt --debug\n    \
                  rprov install --dry-run\n    \
                  rprov verify\n    \
                  rprov list\n    \
                  rprov env"
)]
pub struct Cli {
    /// Root of the library tree (the versioned directory lives under it)
    #[arg(long, global = true, default_value = DEFAULT_LIBRARY_ROOT, value_name = "PATH")]
    pub library_root: PathBuf,

    /// Surface the underlying installer's full output stream
    #[arg(long, short = 'd', global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install every package in the list, then verify and report
    Install(InstallArgs),

    /// Re-check that every requested package is present and loadable
    Verify(VerifyArgs),

    /// List packages present in the destination library
    List,

    /// Print the detected R environment and destination path
    Env,

    /// Show version information
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Install from the conventional list:\n    rprov install\n\n\
                  Install from an explicit file:\n    rprov install ./packages.txt\n\n\
                  Preview the classification plan:\n    rprov install --dry-run\n\n\
                  Full installer output:\n    rprov install --debug\n\n\
                  Machine-readable summary:\n    rprov install --json")]
pub struct InstallArgs {
    /// Newline-delimited package list (blank lines and # comments ignored)
    #[arg(default_value = DEFAULT_PACKAGES_FILE, value_name = "FILE")]
    pub packages_file: PathBuf,

    /// Print the classification plan without installing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Emit the run summary as JSON instead of the human-readable report
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the verify command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Verify the conventional list:\n    rprov verify\n\n\
                  Verify an explicit file:\n    rprov verify ./packages.txt")]
pub struct VerifyArgs {
    /// Newline-delimited package list to verify against
    #[arg(default_value = DEFAULT_PACKAGES_FILE, value_name = "FILE")]
    pub packages_file: PathBuf,
}

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    rprov completions --shell bash > /etc/bash_completion.d/rprov\n\n\
                  Generate zsh completions:\n    rprov completions --shell zsh > ~/.zfunc/_rprov")]
pub struct CompletionsArgs {
    /// Shell type (bash, elvish, fish, powershell, zsh)
    #[arg(long)]
    pub shell: String,
}
