//! Channel-ordered artifact resolution with a fallback repository set.
//!
//! The resolver searches every channel for the highest version satisfying
//! an artifact's range and only then consults the designated fallback
//! repositories. An artifact that carries an explicit version (no range)
//! falls back to that exact version rather than searching; an artifact
//! that cannot be found anywhere is a hard error, never a silent miss.

use std::path::PathBuf;

use tracing::{debug, info};

use qm_model::{Artifact, ArtifactDependencies, ComponentId, Gav, Version, VersionRange};

use crate::channel::{Channel, Repository};
use crate::error::{Error, Result};
use crate::source::{ArtifactSource, SourceFactory};

/// Classifier under which channel manifests are published.
pub const MANIFEST_CLASSIFIER: &str = "manifest";
/// Extension of channel manifest files.
pub const MANIFEST_EXTENSION: &str = "yaml";

/// One channel with its repositories opened as queryable sources.
pub struct ChannelSession {
    channel: Channel,
    sources: Vec<Box<dyn ArtifactSource>>,
}

impl ChannelSession {
    fn open(channel: Channel, factory: &dyn SourceFactory) -> Result<Self> {
        channel.validate()?;
        let sources = channel
            .repositories()
            .iter()
            .map(|repository| factory.create(repository))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { channel, sources })
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    /// The highest version available in this channel's repositories.
    pub fn latest_version(
        &self,
        id: &ComponentId,
        range: &VersionRange,
    ) -> Result<Option<Version>> {
        latest_across(&self.sources, id, range)
    }

    /// The first dependency descriptor any repository publishes for `gav`.
    pub fn descriptor(&self, gav: &Gav) -> Result<Option<ArtifactDependencies>> {
        for source in &self.sources {
            if let Some(descriptor) = source.descriptor(gav)? {
                return Ok(Some(descriptor));
            }
        }
        Ok(None)
    }

    /// The local content path of `artifact`, from the first repository
    /// that has it.
    pub fn fetch(&self, artifact: &Artifact) -> Result<Option<PathBuf>> {
        for source in &self.sources {
            if let Some(path) = source.fetch(artifact)? {
                return Ok(Some(path));
            }
        }
        Ok(None)
    }
}

fn latest_across(
    sources: &[Box<dyn ArtifactSource>],
    id: &ComponentId,
    range: &VersionRange,
) -> Result<Option<Version>> {
    let mut best: Option<Version> = None;
    for source in sources {
        if let Some(version) = source.latest_version(id, range)?
            && best.as_ref().is_none_or(|b| version > *b)
        {
            best = Some(version);
        }
    }
    Ok(best)
}

/// Resolves artifacts across an installation's channels.
///
/// Sessions live for the duration of one resolution session; dropping the
/// resolver releases every opened repository.
pub struct ChannelResolver {
    sessions: Vec<ChannelSession>,
    fallback: Vec<Box<dyn ArtifactSource>>,
}

impl ChannelResolver {
    /// Open every channel's repositories plus the fallback set.
    pub fn open(
        channels: &[Channel],
        fallback: &[Repository],
        factory: &dyn SourceFactory,
    ) -> Result<Self> {
        let sessions = channels
            .iter()
            .map(|channel| ChannelSession::open(channel.clone(), factory))
            .collect::<Result<Vec<_>>>()?;
        let fallback = fallback
            .iter()
            .map(|repository| factory.create(repository))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sessions, fallback })
    }

    /// Per-channel handles, in configuration order.
    pub fn sessions(&self) -> &[ChannelSession] {
        &self.sessions
    }

    /// The highest version of `artifact` available in any channel.
    ///
    /// Without an explicit range the search covers `[current,)`; an
    /// explicit range wins over the version and logs a precedence notice.
    /// A miss in every channel retries through the fallback repositories:
    /// with a range by searching it, without one by verifying the
    /// artifact's own version is present there.
    pub fn find_latest(&self, artifact: &Artifact) -> Result<Gav> {
        let range = match artifact.version_range() {
            Some(range) => {
                info!(
                    artifact = %artifact,
                    range = %range,
                    "artifact declares both a version and a range, the range takes precedence"
                );
                range.clone()
            }
            None => VersionRange::from_floor(artifact.version()),
        };

        let id = artifact.id();
        let mut best: Option<Version> = None;
        for session in &self.sessions {
            if let Some(version) = session.latest_version(id, &range)?
                && best.as_ref().is_none_or(|b| version > *b)
            {
                best = Some(version);
            }
        }
        if let Some(version) = best {
            debug!(artifact = %id, version = %version, "resolved latest version");
            return Ok(Gav::new(id.clone(), version));
        }

        info!(artifact = %id, "not found in any channel, searching fallback repositories");
        let fallback_version = match artifact.version_range() {
            Some(range) => latest_across(&self.fallback, id, range)?,
            None => {
                // An explicit version is re-used, not searched for.
                let exact = VersionRange::exact(artifact.version());
                latest_across(&self.fallback, id, &exact)?
            }
        };

        match fallback_version {
            Some(version) => Ok(Gav::new(id.clone(), version)),
            None => Err(Error::ArtifactNotFound { id: id.clone() }),
        }
    }

    /// The dependency descriptor published alongside `gav`, if any
    /// channel or fallback repository has one.
    pub fn resolve_descriptor(&self, gav: &Gav) -> Result<Option<ArtifactDependencies>> {
        for session in &self.sessions {
            if let Some(descriptor) = session.descriptor(gav)? {
                return Ok(Some(descriptor));
            }
        }
        for source in &self.fallback {
            if let Some(descriptor) = source.descriptor(gav)? {
                return Ok(Some(descriptor));
            }
        }
        Ok(None)
    }

    /// Materialize the artifact's content, returning a new artifact that
    /// carries the local path.
    pub fn resolve(&self, artifact: &Artifact) -> Result<Artifact> {
        for session in &self.sessions {
            if let Some(path) = session.fetch(artifact)? {
                return Ok(artifact.with_path(path));
            }
        }
        for source in &self.fallback {
            if let Some(path) = source.fetch(artifact)? {
                return Ok(artifact.with_path(path));
            }
        }
        Err(Error::ArtifactNotFound {
            id: artifact.id().clone(),
        })
    }
}
