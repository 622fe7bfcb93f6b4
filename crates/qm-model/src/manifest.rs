//! Installed-component manifests.
//!
//! A manifest is the authoritative list of components an installation
//! contains, one entry per identity, persisted as YAML. Updates are never
//! edited into the document directly; the engine applies [`UpdateAction`]s
//! against the in-memory manifest and only then writes the whole document
//! back out.

use serde::{Deserialize, Serialize};

use crate::artifact::Artifact;
use crate::error::{Error, Result};
use crate::identity::ComponentId;
use crate::update::UpdateAction;
use crate::version::Version;

const SCHEMA_VERSION: &str = "1.0.0";

/// The manifest of an installation: named, optionally described, and
/// holding exactly one artifact per component identity.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    name: Option<String>,
    description: Option<String>,
    artifacts: Vec<Artifact>,
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build a manifest from a list of artifacts, rejecting duplicates.
    pub fn from_artifacts(artifacts: Vec<Artifact>) -> Result<Self> {
        let mut manifest = Self::new();
        for artifact in artifacts {
            manifest.add(artifact)?;
        }
        Ok(manifest)
    }

    /// Add a component that must not already be present.
    pub fn add(&mut self, artifact: Artifact) -> Result<()> {
        if self.find(artifact.id()).is_some() {
            return Err(Error::DuplicateComponent {
                id: artifact.id().clone(),
            });
        }
        self.artifacts.push(artifact);
        Ok(())
    }

    /// Record a component, replacing any existing entry with the same
    /// identity or appending a new one.
    pub fn record(&mut self, artifact: Artifact) {
        match self.artifacts.iter_mut().find(|a| a.id() == artifact.id()) {
            Some(existing) => *existing = artifact,
            None => self.artifacts.push(artifact),
        }
    }

    /// Apply an update to the tracked entry for the action's component.
    ///
    /// The entry keeps its position; only the version changes. Updating a
    /// component the manifest does not track is an error.
    pub fn apply(&mut self, action: &UpdateAction) -> Result<()> {
        let entry = self
            .artifacts
            .iter_mut()
            .find(|a| a.id() == action.id())
            .ok_or_else(|| Error::UnknownComponent {
                id: action.id().clone(),
            })?;
        *entry = entry.with_version(action.new_version().clone());
        Ok(())
    }

    pub fn find(&self, id: &ComponentId) -> Option<&Artifact> {
        self.artifacts.iter().find(|a| a.id() == id)
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Parse a manifest document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: ManifestFile = serde_yaml::from_str(content)?;
        let mut manifest = Self {
            name: file.name,
            description: file.description,
            artifacts: Vec::with_capacity(file.streams.len()),
        };
        for entry in file.streams {
            let id = ComponentId::new(&entry.group_id, &entry.artifact_id)?;
            let version = Version::parse(&entry.version)?;
            manifest.add(Artifact::new(id, version))?;
        }
        Ok(manifest)
    }

    /// Serialize to the YAML document format.
    pub fn to_yaml(&self) -> Result<String> {
        let file = ManifestFile {
            schema_version: SCHEMA_VERSION.to_string(),
            name: self.name.clone(),
            description: self.description.clone(),
            streams: self
                .artifacts
                .iter()
                .map(|a| StreamEntry {
                    group_id: a.id().group_id().to_string(),
                    artifact_id: a.id().artifact_id().to_string(),
                    version: a.version().as_str().to_string(),
                })
                .collect(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestFile {
    schema_version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    streams: Vec<StreamEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamEntry {
    group_id: String,
    artifact_id: String,
    version: String,
}
