//! Artifact coordinates and resolved artifacts.

use std::cmp::Ordering;
use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::identity::ComponentId;
use crate::version::{Version, VersionRange};

/// Default extension for artifacts that do not declare one.
pub const DEFAULT_EXTENSION: &str = "jar";

/// A fully pinned coordinate: identity plus version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gav {
    id: ComponentId,
    version: Version,
}

impl Gav {
    pub fn new(id: ComponentId, version: Version) -> Self {
        Self { id, version }
    }

    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    /// Compare the versions of two coordinates with the same identity.
    ///
    /// Comparing versions of different components is always a caller bug,
    /// so mismatched identities fail instead of returning an ordering.
    pub fn compare_version(&self, other: &Gav) -> Result<Ordering> {
        if self.id != other.id {
            return Err(Error::IdentityMismatch {
                left: self.id.clone(),
                right: other.id.clone(),
            });
        }
        Ok(self.version.cmp(&other.version))
    }
}

impl fmt::Display for Gav {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.id, self.version)
    }
}

/// An artifact as tracked by a manifest or materialized from a repository.
///
/// The identity and version pin the coordinate; classifier, extension and
/// version range describe how the artifact is located and how far it may
/// be updated. `path` is only set once the content has been resolved to a
/// local file.
#[derive(Debug, Clone)]
pub struct Artifact {
    gav: Gav,
    classifier: Option<String>,
    extension: String,
    version_range: Option<VersionRange>,
    path: Option<PathBuf>,
}

impl Artifact {
    pub fn new(id: ComponentId, version: Version) -> Self {
        Self {
            gav: Gav::new(id, version),
            classifier: None,
            extension: DEFAULT_EXTENSION.to_string(),
            version_range: None,
            path: None,
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = Some(classifier.into());
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn with_range(mut self, range: VersionRange) -> Self {
        self.version_range = Some(range);
        self
    }

    /// The same artifact at a different version.
    ///
    /// Classifier, extension and range carry over; any resolved path is
    /// cleared because it refers to the old version's content.
    pub fn with_version(&self, version: Version) -> Artifact {
        Artifact {
            gav: Gav::new(self.gav.id.clone(), version),
            classifier: self.classifier.clone(),
            extension: self.extension.clone(),
            version_range: self.version_range.clone(),
            path: None,
        }
    }

    /// The same artifact with resolved local content.
    pub fn with_path(&self, path: PathBuf) -> Artifact {
        Artifact {
            gav: self.gav.clone(),
            classifier: self.classifier.clone(),
            extension: self.extension.clone(),
            version_range: self.version_range.clone(),
            path: Some(path),
        }
    }

    pub fn id(&self) -> &ComponentId {
        self.gav.id()
    }

    pub fn version(&self) -> &Version {
        self.gav.version()
    }

    pub fn gav(&self) -> &Gav {
        &self.gav
    }

    pub fn classifier(&self) -> Option<&str> {
        self.classifier.as_deref()
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn version_range(&self) -> Option<&VersionRange> {
        self.version_range.as_ref()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Repository file name: `artifact-version[-classifier].extension`.
    pub fn file_name(&self) -> String {
        match &self.classifier {
            Some(classifier) => format!(
                "{}-{}-{}.{}",
                self.gav.id().artifact_id(),
                self.gav.version(),
                classifier,
                self.extension
            ),
            None => format!(
                "{}-{}.{}",
                self.gav.id().artifact_id(),
                self.gav.version(),
                self.extension
            ),
        }
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.gav.fmt(f)
    }
}
