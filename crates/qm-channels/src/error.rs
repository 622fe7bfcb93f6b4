//! Error types for channel and artifact resolution.

use std::path::PathBuf;

use qm_model::Gav;

/// Result alias for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No channel and no fallback repository could provide the artifact.
    #[error("artifact [{id}] not found")]
    ArtifactNotFound { id: qm_model::ComponentId },

    /// A channel definition that cannot be used for resolution.
    #[error("invalid channel definition: {reason}")]
    InvalidChannel { reason: String },

    /// A repository URL that could not be parsed.
    #[error("invalid repository URL '{url}'")]
    InvalidUrl { url: String },

    /// A repository URL with a scheme no source implementation handles.
    #[error("unsupported URL scheme '{scheme}' in '{url}'")]
    UnsupportedScheme { url: String, scheme: String },

    /// A remote fetch that failed at the HTTP layer.
    #[error("unable to fetch '{url}'")]
    RemoteResolution {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client itself could not be constructed.
    #[error("unable to initialize the HTTP client")]
    HttpClient(#[source] reqwest::Error),

    /// A dependency descriptor that exists but cannot be parsed.
    #[error("invalid dependency descriptor for {gav}")]
    InvalidDescriptor {
        gav: Gav,
        #[source]
        source: qm_model::Error,
    },

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Model(#[from] qm_model::Error),

    #[error("invalid YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
