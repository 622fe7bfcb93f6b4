//! Dependency descriptors published alongside artifacts.
//!
//! A descriptor lists the minimum versions of other components an artifact
//! needs at runtime. Repositories publish it as a sibling file under the
//! `dependencies` classifier; artifacts without one simply have no
//! declared requirements.

use serde::{Deserialize, Serialize};

use crate::artifact::Gav;
use crate::error::Result;
use crate::identity::ComponentId;
use crate::version::Version;

/// Classifier under which descriptors are published.
pub const DESCRIPTOR_CLASSIFIER: &str = "dependencies";
/// Extension of descriptor files.
pub const DESCRIPTOR_EXTENSION: &str = "yaml";

const SCHEMA_VERSION: &str = "1.0.0";

/// The declared requirements of one artifact version.
///
/// Each requirement is a floor: the named component must be installed at
/// the given version or higher.
#[derive(Debug, Clone, Default)]
pub struct ArtifactDependencies {
    requirements: Vec<Gav>,
}

impl ArtifactDependencies {
    pub fn new(requirements: Vec<Gav>) -> Self {
        Self { requirements }
    }

    pub fn requirements(&self) -> &[Gav] {
        &self.requirements
    }

    pub fn len(&self) -> usize {
        self.requirements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requirements.is_empty()
    }

    /// Parse a descriptor document.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let file: DescriptorFile = serde_yaml::from_str(content)?;
        let mut requirements = Vec::with_capacity(file.dependencies.len());
        for entry in file.dependencies {
            let id = ComponentId::new(&entry.group_id, &entry.artifact_id)?;
            let version = Version::parse(&entry.version)?;
            requirements.push(Gav::new(id, version));
        }
        Ok(Self { requirements })
    }

    /// Serialize to the YAML document format.
    pub fn to_yaml(&self) -> Result<String> {
        let file = DescriptorFile {
            schema_version: SCHEMA_VERSION.to_string(),
            dependencies: self
                .requirements
                .iter()
                .map(|gav| RequirementEntry {
                    group_id: gav.id().group_id().to_string(),
                    artifact_id: gav.id().artifact_id().to_string(),
                    version: gav.version().as_str().to_string(),
                })
                .collect(),
        };
        Ok(serde_yaml::to_string(&file)?)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DescriptorFile {
    schema_version: String,
    #[serde(default)]
    dependencies: Vec<RequirementEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RequirementEntry {
    group_id: String,
    artifact_id: String,
    version: String,
}
