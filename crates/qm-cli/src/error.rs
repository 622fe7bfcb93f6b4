//! Error types for qm-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from the update engine
    #[error(transparent)]
    Engine(#[from] qm_engine::Error),

    /// Error from channel resolution
    #[error(transparent)]
    Channels(#[from] qm_channels::Error),

    /// Error from metadata persistence
    #[error(transparent)]
    Metadata(#[from] qm_metadata::Error),

    /// Error from the component model
    #[error(transparent)]
    Model(#[from] qm_model::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Settings file could not be parsed
    #[error("Invalid settings file: {0}")]
    Settings(#[from] serde_yaml::Error),

    /// Interactive prompt error
    #[error("Interactive prompt error: {0}")]
    Dialoguer(#[from] dialoguer::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    #[allow(dead_code)]
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }
}
