//! Status command implementation

use std::path::Path;

use colored::Colorize;

use crate::error::Result;

/// Run the status command
pub fn run_status(dir: &Path) -> Result<()> {
    let manifest = match qm_metadata::read_manifest(dir) {
        Ok(manifest) => manifest,
        Err(qm_metadata::Error::MetadataMissing { .. }) => {
            println!("{}", "Not a provisioned installation".red().bold());
            println!();
            println!(
                "No metadata found under {} in {}.",
                ".installation".cyan(),
                dir.display()
            );
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let channels = qm_metadata::read_channels(dir)?;

    println!("{}", "Installation Status".bold());
    println!();
    println!("{}:   {}", "Path".dimmed(), dir.display());
    if let Some(name) = manifest.name() {
        println!("{}:   {}", "Name".dimmed(), name.cyan());
    }
    println!();

    println!("{}:", "Components".bold());
    if manifest.is_empty() {
        println!("  {}", "None".dimmed());
    } else {
        for artifact in manifest.artifacts() {
            println!(
                "  {} {} {}",
                "+".green(),
                artifact.id().to_string().cyan(),
                artifact.version()
            );
        }
    }
    println!();

    println!("{}:", "Channels".bold());
    for channel in &channels {
        let repos: Vec<&str> = channel.repositories().iter().map(|r| r.id()).collect();
        println!(
            "  {} {} ({})",
            "+".green(),
            channel.name().unwrap_or("<unnamed>").cyan(),
            repos.join(", ")
        );
    }

    if let Some(record) = qm_metadata::read_version_record(dir)? {
        println!();
        println!("{}: {}", "Channel manifests".bold(), record.summary());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use qm_test_utils::{TestInstallation, TestRepository};

    use super::*;

    #[test]
    fn test_status_not_provisioned() {
        let temp = tempfile::tempdir().unwrap();
        assert!(run_status(temp.path()).is_ok());
    }

    #[test]
    fn test_status_provisioned() {
        let repo = TestRepository::new();
        let install = TestInstallation::new();
        install.bootstrap(&[repo.channel()], &[("org.acme", "core", "1.0.0")]);
        assert!(run_status(install.root()).is_ok());
    }
}
