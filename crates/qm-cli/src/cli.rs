//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// Quartermaster - Update provisioned server installations
#[derive(Parser, Debug)]
#[command(name = "qm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Check for and apply component updates
    ///
    /// Examples:
    ///   qm update                          # Update the current directory
    ///   qm update /srv/server              # Update a specific installation
    ///   qm update --artifact org.acme:core # Update a single component
    ///   qm update --dry-run                # Preview without changing
    Update {
        /// Installation directory
        #[arg(default_value = ".")]
        dir: String,

        /// Update a single component, given as group:artifact
        #[arg(long)]
        artifact: Option<String>,

        /// Preview updates without applying them
        #[arg(long)]
        dry_run: bool,

        /// Apply without asking for confirmation
        #[arg(short, long)]
        yes: bool,
    },

    /// Show the installation's components and channels
    Status {
        /// Installation directory
        #[arg(default_value = ".")]
        dir: String,
    },
}
