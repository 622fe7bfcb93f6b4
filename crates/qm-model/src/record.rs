//! Manifest version records.
//!
//! An audit record of which manifest version each configured channel was
//! using when the installation was provisioned or last updated. Channels
//! resolve their manifest three different ways, so the record keeps one
//! section per kind and a channel contributes to exactly one of them.

use serde::{Deserialize, Serialize};

use crate::error::Result;

const SCHEMA_VERSION: &str = "1.0.0";

fn default_schema_version() -> String {
    SCHEMA_VERSION.to_string()
}

/// A channel whose manifest is a versioned coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenManifestVersion {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A channel whose manifest is fetched from a URL, pinned by content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlManifestVersion {
    pub url: String,
    pub hash: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// A channel without a manifest coordinate, recorded by its repositories
/// and no-stream strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenManifestVersion {
    pub repos: Vec<String>,
    pub strategy: String,
}

/// The per-channel manifest versions of one provisioning or update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestVersionRecord {
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub maven: Vec<MavenManifestVersion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub url: Vec<UrlManifestVersion>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub open: Vec<OpenManifestVersion>,
}

impl ManifestVersionRecord {
    pub fn new() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            maven: Vec::new(),
            url: Vec::new(),
            open: Vec::new(),
        }
    }

    pub fn add_maven(&mut self, entry: MavenManifestVersion) {
        self.maven.push(entry);
    }

    pub fn add_url(&mut self, entry: UrlManifestVersion) {
        self.url.push(entry);
    }

    pub fn add_open(&mut self, entry: OpenManifestVersion) {
        self.open.push(entry);
    }

    pub fn len(&self) -> usize {
        self.maven.len() + self.url.len() + self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// One-line summary of every entry, for command output.
    ///
    /// Coordinate entries print as `group:artifact:version` with `?` for an
    /// unknown version, URL entries print the URL, open entries list their
    /// repositories and strategy.
    pub fn summary(&self) -> String {
        let mut parts = Vec::with_capacity(self.len());
        for entry in &self.maven {
            let version = if entry.version.is_empty() {
                "?"
            } else {
                &entry.version
            };
            parts.push(format!(
                "{}:{}:{}",
                entry.group_id, entry.artifact_id, version
            ));
        }
        for entry in &self.url {
            parts.push(entry.url.clone());
        }
        for entry in &self.open {
            parts.push(format!("{} ({})", entry.repos.join("+"), entry.strategy));
        }
        format!("[{}]", parts.join(", "))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}
