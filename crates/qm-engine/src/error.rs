//! Error types for update resolution.

use std::path::PathBuf;

use qm_model::{ComponentId, Version};

/// Result alias for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A requested or required component is not in the installed manifest.
    #[error("artifact [{id}] not found in the installed manifest")]
    ComponentNotInstalled { id: ComponentId },

    /// A required minimum version that no channel can satisfy.
    #[error("unable to find [{id}] in version >= {floor}")]
    UnresolvedConstraint {
        id: ComponentId,
        floor: Version,
        /// The best version any channel offered, when one was found at all.
        best: Option<Version>,
    },

    /// An update action whose new artifact has no resolved local content.
    #[error("artifact [{id}] has no resolved content to install")]
    MissingContent { id: ComponentId },

    #[error("I/O error at {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Channel(#[from] qm_channels::Error),

    #[error(transparent)]
    Metadata(#[from] qm_metadata::Error),

    #[error(transparent)]
    Model(#[from] qm_model::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
