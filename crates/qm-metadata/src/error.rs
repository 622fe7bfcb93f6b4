//! Error types for metadata persistence.

use std::path::PathBuf;

/// Result alias for metadata operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The reserved metadata path exists but is not a directory.
    #[error("the metadata path {path} exists and is not a directory")]
    NotADirectory { path: PathBuf },

    /// Bootstrap attempted over an installation that already has metadata.
    #[error("installation metadata already exists at {path}")]
    AlreadyInitialized { path: PathBuf },

    /// A metadata write whose parent directory does not exist.
    #[error("invalid target path {path}: parent directory does not exist")]
    InvalidTargetPath { path: PathBuf },

    /// A required metadata file is missing.
    #[error("installation metadata is missing: {path}")]
    MetadataMissing { path: PathBuf },

    /// Advisory lock on a metadata file could not be acquired.
    #[error("lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Model(#[from] qm_model::Error),

    #[error(transparent)]
    Channel(#[from] qm_channels::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
