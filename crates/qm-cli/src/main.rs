//! Quartermaster CLI
//!
//! The command-line interface for updating provisioned installations.

mod cli;
mod commands;
mod error;
mod interactive;
mod settings;

use std::path::PathBuf;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    match cli.command {
        Some(Commands::Update {
            dir,
            artifact,
            dry_run,
            yes,
        }) => commands::run_update(&PathBuf::from(dir), artifact.as_deref(), dry_run, yes),
        Some(Commands::Status { dir }) => commands::run_status(&PathBuf::from(dir)),
        None => {
            // No command provided - show help hint
            println!("{} Quartermaster CLI", "qm".green().bold());
            println!();
            println!("Run {} for available commands.", "qm --help".cyan());
            Ok(())
        }
    }
}
