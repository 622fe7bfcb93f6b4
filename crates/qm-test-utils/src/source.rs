//! In-memory [`ArtifactSource`] for engine tests.

use std::collections::HashMap;
use std::path::PathBuf;

use qm_channels::{ArtifactSource, Repository, SourceFactory};
use qm_model::{Artifact, ArtifactDependencies, ComponentId, Gav, Version, VersionRange};

/// An artifact source answering from in-memory tables, so resolution
/// tests need no filesystem layout.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    id: String,
    versions: HashMap<ComponentId, Vec<Version>>,
    descriptors: HashMap<(ComponentId, String), ArtifactDependencies>,
    contents: HashMap<(ComponentId, String), PathBuf>,
}

impl StaticSource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Make a version of a component available.
    pub fn with_version(mut self, group: &str, artifact: &str, version: &str) -> Self {
        let id = ComponentId::new(group, artifact).unwrap();
        self.versions
            .entry(id)
            .or_default()
            .push(Version::parse(version).unwrap());
        self
    }

    /// Publish a dependency descriptor for a component version.
    pub fn with_descriptor(
        mut self,
        group: &str,
        artifact: &str,
        version: &str,
        requirements: &[(&str, &str, &str)],
    ) -> Self {
        let id = ComponentId::new(group, artifact).unwrap();
        let descriptor = ArtifactDependencies::new(
            requirements
                .iter()
                .map(|(g, a, v)| {
                    Gav::new(
                        ComponentId::new(g, a).unwrap(),
                        Version::parse(v).unwrap(),
                    )
                })
                .collect(),
        );
        self.descriptors.insert((id, version.to_string()), descriptor);
        self
    }

    /// Make resolvable content available for a component version.
    pub fn with_content(
        mut self,
        group: &str,
        artifact: &str,
        version: &str,
        path: impl Into<PathBuf>,
    ) -> Self {
        let id = ComponentId::new(group, artifact).unwrap();
        self.contents.insert((id, version.to_string()), path.into());
        self
    }
}

impl ArtifactSource for StaticSource {
    fn id(&self) -> &str {
        &self.id
    }

    fn latest_version(
        &self,
        id: &ComponentId,
        range: &VersionRange,
    ) -> qm_channels::Result<Option<Version>> {
        Ok(self
            .versions
            .get(id)
            .into_iter()
            .flatten()
            .filter(|v| range.contains(v))
            .max()
            .cloned())
    }

    fn descriptor(&self, gav: &Gav) -> qm_channels::Result<Option<ArtifactDependencies>> {
        let key = (gav.id().clone(), gav.version().as_str().to_string());
        Ok(self.descriptors.get(&key).cloned())
    }

    fn fetch(&self, artifact: &Artifact) -> qm_channels::Result<Option<PathBuf>> {
        let key = (
            artifact.id().clone(),
            artifact.version().as_str().to_string(),
        );
        Ok(self.contents.get(&key).cloned())
    }
}

/// A [`SourceFactory`] handing out pre-built [`StaticSource`]s by
/// repository id. Repository URLs are ignored.
#[derive(Debug, Default)]
pub struct StaticFactory {
    sources: HashMap<String, StaticSource>,
}

impl StaticFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: StaticSource) -> Self {
        self.sources.insert(source.id().to_string(), source);
        self
    }
}

impl SourceFactory for StaticFactory {
    fn create(&self, repository: &Repository) -> qm_channels::Result<Box<dyn ArtifactSource>> {
        match self.sources.get(repository.id()) {
            Some(source) => Ok(Box::new(source.clone())),
            None => Err(qm_channels::Error::InvalidChannel {
                reason: format!("no static source registered for '{}'", repository.id()),
            }),
        }
    }
}
