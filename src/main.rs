//! rprov - R package library provisioner
//!
//! A command line tool that turns a declarative package list into a
//! populated, verified, architecture-segregated R package library. Built for
//! container image provisioning: individual package failures are isolated
//! and reported, re-runs are idempotent, and the exit status tells the
//! surrounding build pipeline whether the stage succeeded.

use clap::Parser;

mod cli;
mod commands;
mod env;
mod error;
mod executor;
mod manifest;
mod pm;
mod progress;
mod report;
mod source;
mod verify;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(&cli.library_root, cli.debug, &args),
        Commands::Verify(args) => commands::verify::run(&cli.library_root, &args),
        Commands::List => commands::list::run(&cli.library_root),
        Commands::Env => commands::env::run(&cli.library_root),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(&args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
