//! Component and version model for Quartermaster.
//!
//! This crate provides the identity and version types, installed-component
//! manifests, dependency descriptors, planned update actions and manifest
//! version records the rest of the workspace builds on.

pub mod artifact;
pub mod dependencies;
pub mod error;
pub mod identity;
pub mod manifest;
pub mod record;
pub mod update;
pub mod version;

pub use artifact::{Artifact, DEFAULT_EXTENSION, Gav};
pub use dependencies::{ArtifactDependencies, DESCRIPTOR_CLASSIFIER, DESCRIPTOR_EXTENSION};
pub use error::{Error, Result};
pub use identity::ComponentId;
pub use manifest::Manifest;
pub use record::{
    ManifestVersionRecord, MavenManifestVersion, OpenManifestVersion, UrlManifestVersion,
};
pub use update::UpdateAction;
pub use version::{Version, VersionRange};
