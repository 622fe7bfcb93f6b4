//! Update command implementation

use std::path::Path;

use colored::Colorize;

use qm_engine::{UpdateEngine, UpdateSet};
use qm_model::ComponentId;

use crate::error::Result;
use crate::interactive;
use crate::settings::UserSettings;

/// Run the update command
pub fn run_update(dir: &Path, artifact: Option<&str>, dry_run: bool, yes: bool) -> Result<()> {
    let settings = UserSettings::load()?;
    let config = settings.engine_config()?;
    let anchor = config.anchor.clone();
    let mut engine = UpdateEngine::open(dir, config)?;

    println!("{} Checking for updates...", "=>".blue().bold());
    let set = match artifact {
        Some(raw) => {
            let id = raw.parse::<ComponentId>()?;
            engine.find_update(&id)?
        }
        None => engine.find_updates()?,
    };

    if set.is_empty() {
        println!("{} No updates to execute.", "OK".green().bold());
        return Ok(());
    }

    print_preview(&set, anchor.as_ref());

    if dry_run {
        println!("{} Dry run. No changes were made.", "OK".green().bold());
        return Ok(());
    }

    if !yes && !interactive::confirm_apply()? {
        println!("Update cancelled.");
        return Ok(());
    }

    let record = engine.apply(&set)?;
    println!("{} Update complete.", "OK".green().bold());
    println!("Channel manifests: {}", record.summary());
    Ok(())
}

fn print_preview(set: &UpdateSet, anchor: Option<&ComponentId>) {
    if !set.feature_packs().is_empty() {
        println!("{}:", "Feature-pack updates".bold());
        for update in set.feature_packs().updates() {
            println!("  {} {}", "+".green(), update);
        }
        println!();
    }

    if !set.artifacts().is_empty() {
        println!("{}:", "Component updates".bold());
        for action in set.artifacts().actions() {
            println!("  {} {}", "+".green(), action);
        }
        println!();
    }

    if let Some(action) = set.anchor_action(anchor) {
        println!(
            "{} This update includes {}; follow its post-update steps after applying.",
            "NOTE".yellow().bold(),
            action.id().to_string().cyan()
        );
        println!();
    }
}
