//! Channel definitions.
//!
//! A channel names the repositories an installation receives updates from
//! and, optionally, a manifest coordinate identifying which manifest the
//! channel serves. Installations persist their channel list verbatim, so
//! the wire format here has to stay stable.

use serde::{Deserialize, Serialize};

use qm_model::{ComponentId, Version};

use crate::error::{Error, Result};

/// A named repository location inside a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    id: String,
    url: String,
}

impl Repository {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Where a channel's manifest comes from.
///
/// Serialized externally tagged, so a channel document reads
/// `manifest: {maven: {...}}` or `manifest: {url: ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ManifestCoordinate {
    Maven(MavenCoordinate),
    Url(String),
}

/// A manifest published as a repository artifact, optionally pinned to a
/// version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MavenCoordinate {
    group_id: String,
    artifact_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

impl MavenCoordinate {
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: None,
        }
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }

    pub fn raw_version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn component_id(&self) -> Result<ComponentId> {
        Ok(ComponentId::new(&self.group_id, &self.artifact_id)?)
    }

    pub fn parsed_version(&self) -> Result<Option<Version>> {
        match &self.version {
            Some(raw) => Ok(Some(Version::parse(raw)?)),
            None => Ok(None),
        }
    }
}

/// Channel behavior when an artifact has no stream in the manifest.
///
/// The strategy is recorded and passed through; resolution here never
/// interprets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoStreamStrategy {
    #[default]
    Original,
    Latest,
    MavenLatest,
    MavenRelease,
    None,
}

impl NoStreamStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            NoStreamStrategy::Original => "original",
            NoStreamStrategy::Latest => "latest",
            NoStreamStrategy::MavenLatest => "maven-latest",
            NoStreamStrategy::MavenRelease => "maven-release",
            NoStreamStrategy::None => "none",
        }
    }

    fn is_original(&self) -> bool {
        matches!(self, NoStreamStrategy::Original)
    }
}

impl std::fmt::Display for NoStreamStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One update channel of an installation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_yaml::with::singleton_map"
    )]
    manifest: Option<ManifestCoordinate>,
    #[serde(default)]
    repositories: Vec<Repository>,
    #[serde(
        rename = "resolve-if-no-stream",
        default,
        skip_serializing_if = "NoStreamStrategy::is_original"
    )]
    resolve_if_no_stream: NoStreamStrategy,
}

impl Channel {
    pub fn new(repositories: Vec<Repository>) -> Self {
        Self {
            name: None,
            manifest: None,
            repositories,
            resolve_if_no_stream: NoStreamStrategy::default(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_manifest(mut self, coordinate: ManifestCoordinate) -> Self {
        self.manifest = Some(coordinate);
        self
    }

    pub fn with_strategy(mut self, strategy: NoStreamStrategy) -> Self {
        self.resolve_if_no_stream = strategy;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn manifest(&self) -> Option<&ManifestCoordinate> {
        self.manifest.as_ref()
    }

    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    pub fn resolve_if_no_stream(&self) -> NoStreamStrategy {
        self.resolve_if_no_stream
    }

    /// A channel is only usable if it names at least one repository.
    pub fn validate(&self) -> Result<()> {
        if self.repositories.is_empty() {
            return Err(Error::InvalidChannel {
                reason: format!(
                    "channel '{}' has no repositories",
                    self.name.as_deref().unwrap_or("<unnamed>")
                ),
            });
        }
        Ok(())
    }
}

/// Parse a channel list document.
pub fn channels_from_yaml(content: &str) -> Result<Vec<Channel>> {
    Ok(serde_yaml::from_str(content)?)
}

/// Serialize a channel list to YAML.
pub fn channels_to_yaml(channels: &[Channel]) -> Result<String> {
    Ok(serde_yaml::to_string(channels)?)
}
