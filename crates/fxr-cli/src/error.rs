//! Error types for fxr-cli

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// Errors that can occur in CLI operations
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Error from fxr-core
    #[error(transparent)]
    Core(#[from] fxr_core::Error),

    /// Standard I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Override settings file that does not deserialize
    #[error("Invalid overrides file: {0}")]
    Overrides(#[from] toml::de::Error),

    /// JSON serialization error
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// User-facing error with a message
    #[error("{message}")]
    User { message: String },
}

impl CliError {
    /// Create a new user error with the given message
    pub fn user(message: impl Into<String>) -> Self {
        Self::User {
            message: message.into(),
        }
    }

    /// Resolution error kind, when the failure came from resolution.
    pub fn kind(&self) -> Option<fxr_core::ErrorKind> {
        match self {
            Self::Core(e) => Some(e.kind()),
            Self::Io(_) => Some(fxr_core::ErrorKind::Io),
            _ => None,
        }
    }
}

impl From<fxr_deps::Error> for CliError {
    fn from(e: fxr_deps::Error) -> Self {
        Self::Core(e.into())
    }
}
