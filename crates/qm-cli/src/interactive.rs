//! Interactive prompts for CLI commands
//!
//! Uses dialoguer for terminal-based confirmation.

use dialoguer::Confirm;

use crate::error::Result;

/// Ask whether the previewed updates should be applied.
pub fn confirm_apply() -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt("Apply these updates?")
        .default(true)
        .interact()?)
}
