//! Channel definitions and artifact resolution for Quartermaster.
//!
//! A channel names the repositories an installation receives updates from.
//! This crate provides the channel configuration model, the
//! [`ArtifactSource`] transport seam with a filesystem-backed
//! implementation, and the [`ChannelResolver`] that searches channels in
//! order with a designated fallback repository set.

pub mod channel;
pub mod error;
pub mod fetch;
pub mod resolver;
pub mod source;

pub use channel::{
    Channel, ManifestCoordinate, MavenCoordinate, NoStreamStrategy, Repository,
    channels_from_yaml, channels_to_yaml,
};
pub use error::{Error, Result};
pub use fetch::UrlFetcher;
pub use resolver::{ChannelResolver, ChannelSession, MANIFEST_CLASSIFIER, MANIFEST_EXTENSION};
pub use source::{ArtifactSource, DefaultSourceFactory, LocalRepositorySource, SourceFactory};
