//! Planned update actions.

use std::fmt;

use crate::artifact::Artifact;
use crate::error::{Error, Result};
use crate::identity::ComponentId;
use crate::version::Version;

/// A single planned update: one component moving from an installed version
/// to a strictly newer one.
///
/// Construction enforces the invariant, so an action in a plan is always a
/// genuine upgrade of a single identity.
#[derive(Debug, Clone)]
pub struct UpdateAction {
    old: Artifact,
    new: Artifact,
}

impl UpdateAction {
    pub fn new(old: Artifact, new: Artifact) -> Result<Self> {
        if old.id() != new.id() {
            return Err(Error::IdentityMismatch {
                left: old.id().clone(),
                right: new.id().clone(),
            });
        }
        if new.version() <= old.version() {
            return Err(Error::NotAnUpgrade {
                id: old.id().clone(),
                old: old.version().clone(),
                new: new.version().clone(),
            });
        }
        Ok(Self { old, new })
    }

    pub fn id(&self) -> &ComponentId {
        self.old.id()
    }

    pub fn old(&self) -> &Artifact {
        &self.old
    }

    pub fn new_artifact(&self) -> &Artifact {
        &self.new
    }

    pub fn old_version(&self) -> &Version {
        self.old.version()
    }

    pub fn new_version(&self) -> &Version {
        self.new.version()
    }
}

impl fmt::Display for UpdateAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ==> {}",
            self.id(),
            self.old_version(),
            self.new_version()
        )
    }
}
