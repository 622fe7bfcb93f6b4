//! Artifact sources backing a channel's repositories.
//!
//! An [`ArtifactSource`] answers three questions about one repository:
//! which versions of a component it has, what a given version declares as
//! dependencies, and where the version's content lives locally. The
//! trait is the seam for remote transports; the implementation shipped
//! here serves repositories laid out on the local filesystem.

use std::path::{Path, PathBuf};

use tracing::debug;
use url::Url;

use qm_model::dependencies::{DESCRIPTOR_CLASSIFIER, DESCRIPTOR_EXTENSION};
use qm_model::{Artifact, ArtifactDependencies, ComponentId, Gav, Version, VersionRange};

use crate::channel::Repository;
use crate::error::{Error, Result};

/// A single repository that can be queried for artifacts.
pub trait ArtifactSource: std::fmt::Debug {
    /// The repository id this source was created from.
    fn id(&self) -> &str;

    /// The highest version of `id` available inside `range`, if any.
    fn latest_version(&self, id: &ComponentId, range: &VersionRange) -> Result<Option<Version>>;

    /// The dependency descriptor published alongside `gav`, if any.
    fn descriptor(&self, gav: &Gav) -> Result<Option<ArtifactDependencies>>;

    /// The local path of the artifact's content, if this source has it.
    fn fetch(&self, artifact: &Artifact) -> Result<Option<PathBuf>>;
}

/// A repository stored on the local filesystem in the conventional
/// `group/segments/artifact/version/file` layout.
#[derive(Debug)]
pub struct LocalRepositorySource {
    id: String,
    root: PathBuf,
}

impl LocalRepositorySource {
    pub fn new(id: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            root: root.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn artifact_dir(&self, id: &ComponentId) -> PathBuf {
        let mut dir = self.root.clone();
        for segment in id.group_id().split('.') {
            dir.push(segment);
        }
        dir.push(id.artifact_id());
        dir
    }

    fn version_dir(&self, gav: &Gav) -> PathBuf {
        self.artifact_dir(gav.id()).join(gav.version().as_str())
    }
}

impl ArtifactSource for LocalRepositorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn latest_version(&self, id: &ComponentId, range: &VersionRange) -> Result<Option<Version>> {
        let dir = self.artifact_dir(id);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io { path: dir, source: e }),
        };

        let mut latest: Option<Version> = None;
        for entry in entries {
            let entry = entry.map_err(|e| Error::Io {
                path: dir.clone(),
                source: e,
            })?;
            if !entry.path().is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Ok(version) = Version::parse(&name.to_string_lossy()) else {
                debug!(
                    repository = %self.id,
                    entry = %name.to_string_lossy(),
                    "skipping directory that is not a version"
                );
                continue;
            };
            if !range.contains(&version) {
                continue;
            }
            if latest.as_ref().is_none_or(|best| version > *best) {
                latest = Some(version);
            }
        }
        Ok(latest)
    }

    fn descriptor(&self, gav: &Gav) -> Result<Option<ArtifactDependencies>> {
        let file_name = format!(
            "{}-{}-{}.{}",
            gav.id().artifact_id(),
            gav.version(),
            DESCRIPTOR_CLASSIFIER,
            DESCRIPTOR_EXTENSION
        );
        let path = self.version_dir(gav).join(file_name);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Error::Io { path, source: e }),
        };
        let descriptor = ArtifactDependencies::from_yaml(&content).map_err(|e| {
            Error::InvalidDescriptor {
                gav: gav.clone(),
                source: e,
            }
        })?;
        Ok(Some(descriptor))
    }

    fn fetch(&self, artifact: &Artifact) -> Result<Option<PathBuf>> {
        let path = self.version_dir(artifact.gav()).join(artifact.file_name());
        if path.is_file() {
            Ok(Some(path))
        } else {
            Ok(None)
        }
    }
}

/// Creates sources from repository definitions.
///
/// Injected into [`crate::resolver::ChannelResolver::open`] so callers
/// with a remote transport can substitute their own implementation.
pub trait SourceFactory {
    fn create(&self, repository: &Repository) -> Result<Box<dyn ArtifactSource>>;
}

/// Factory for repositories reachable through the filesystem: `file://`
/// URLs and plain paths. Remote schemes are rejected up front rather
/// than failing on first use.
#[derive(Debug, Default)]
pub struct DefaultSourceFactory;

impl SourceFactory for DefaultSourceFactory {
    fn create(&self, repository: &Repository) -> Result<Box<dyn ArtifactSource>> {
        let raw = repository.url();
        match Url::parse(raw) {
            Ok(url) if url.scheme() == "file" => {
                let root = url.to_file_path().map_err(|()| Error::InvalidUrl {
                    url: raw.to_string(),
                })?;
                Ok(Box::new(LocalRepositorySource::new(repository.id(), root)))
            }
            Ok(url) => Err(Error::UnsupportedScheme {
                url: raw.to_string(),
                scheme: url.scheme().to_string(),
            }),
            Err(url::ParseError::RelativeUrlWithoutBase) => Ok(Box::new(
                LocalRepositorySource::new(repository.id(), PathBuf::from(raw)),
            )),
            Err(_) => Err(Error::InvalidUrl {
                url: raw.to_string(),
            }),
        }
    }
}
