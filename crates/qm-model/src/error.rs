use crate::identity::ComponentId;
use crate::version::Version;

/// Errors that can occur in the component model.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Compared versions of two different components.
    #[error("cannot compare versions of different components: {left} vs {right}")]
    IdentityMismatch { left: ComponentId, right: ComponentId },

    /// Malformed `group:artifact` coordinate.
    #[error("invalid component coordinate '{value}': {reason}")]
    InvalidCoordinate { value: String, reason: String },

    /// Version string that cannot be segmented.
    #[error("invalid version '{value}': {reason}")]
    InvalidVersion { value: String, reason: String },

    /// Malformed version range.
    #[error("invalid version range '{value}': {reason}")]
    InvalidRange { value: String, reason: String },

    /// Manifest already holds an entry for the component.
    #[error("duplicate manifest entry for {id}")]
    DuplicateComponent { id: ComponentId },

    /// Component missing from the manifest.
    #[error("component {id} is not present in the manifest")]
    UnknownComponent { id: ComponentId },

    /// Update action whose new version does not exceed the old one.
    #[error("update for {id} must increase the version: {old} ==> {new}")]
    NotAnUpgrade {
        id: ComponentId,
        old: Version,
        new: Version,
    },

    /// Failed to parse or serialize a YAML document.
    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
