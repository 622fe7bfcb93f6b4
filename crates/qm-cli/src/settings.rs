//! User settings from the Quartermaster config directory.
//!
//! Settings are optional; a missing file yields the defaults. The file
//! lives at `<config-dir>/quartermaster/config.yaml`, e.g.
//! `~/.config/quartermaster/config.yaml` on Linux.

use std::path::PathBuf;

use serde::Deserialize;

use qm_channels::Repository;
use qm_engine::EngineConfig;
use qm_model::ComponentId;

use crate::error::Result;

const CONFIG_DIR: &str = "quartermaster";
const CONFIG_FILE: &str = "config.yaml";

/// The user-level settings document.
#[derive(Debug, Default, Deserialize)]
pub struct UserSettings {
    /// Component called out in update previews, as `group:artifact`.
    #[serde(default)]
    pub anchor: Option<String>,

    /// Repositories consulted when every channel misses.
    #[serde(default)]
    pub fallback_repositories: Vec<Repository>,
}

impl UserSettings {
    /// The settings file location, if a config directory exists.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the settings file, defaulting when it is absent.
    pub fn load() -> Result<Self> {
        match Self::path() {
            Some(path) if path.is_file() => {
                Self::from_yaml(&std::fs::read_to_string(&path)?)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Parse a settings document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Translate into the engine's session configuration.
    pub fn engine_config(&self) -> Result<EngineConfig> {
        let anchor = match &self.anchor {
            Some(raw) => Some(raw.parse::<ComponentId>()?),
            None => None,
        };
        Ok(EngineConfig {
            anchor,
            fallback_repositories: self.fallback_repositories.clone(),
        })
    }
}
