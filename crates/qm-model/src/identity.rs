//! Component identity.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Identifies a component independent of its version.
///
/// Two artifacts with the same `ComponentId` are versions of the same
/// component; a manifest holds at most one of them. Parses from and
/// displays as `group:artifact`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    group_id: String,
    artifact_id: String,
}

impl ComponentId {
    /// Build an identity from its two parts.
    ///
    /// Both parts must be non-empty and must not contain `:`.
    pub fn new(group_id: &str, artifact_id: &str) -> Result<Self> {
        for (part, label) in [(group_id, "group"), (artifact_id, "artifact")] {
            if part.is_empty() {
                return Err(Error::InvalidCoordinate {
                    value: format!("{group_id}:{artifact_id}"),
                    reason: format!("empty {label} id"),
                });
            }
            if part.contains(':') {
                return Err(Error::InvalidCoordinate {
                    value: format!("{group_id}:{artifact_id}"),
                    reason: format!("{label} id contains ':'"),
                });
            }
        }

        Ok(Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
        })
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn artifact_id(&self) -> &str {
        &self.artifact_id
    }
}

impl FromStr for ComponentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut parts = s.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(group), Some(artifact), None) => Self::new(group.trim(), artifact.trim()),
            _ => Err(Error::InvalidCoordinate {
                value: s.to_string(),
                reason: "expected exactly one ':' separating group and artifact".to_string(),
            }),
        }
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)
    }
}
