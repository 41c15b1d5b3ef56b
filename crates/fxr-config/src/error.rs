//! Error types for fxr-config

use std::path::PathBuf;

/// Result type for configuration parsing
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that invalidate a runtime configuration
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed JSON or a missing/mistyped field
    #[error("Failed to parse runtime config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// Roll-forward settings that cannot be honoured as written
    #[error("Invalid runtime config {path}: {source}")]
    Validation {
        path: PathBuf,
        #[source]
        source: fxr_version::Error,
    },

    /// Roll-forward environment variables that cannot be honoured
    #[error("Invalid value in environment variable {variable}: {message}")]
    Environment { variable: String, message: String },

    /// A framework version string that does not parse
    #[error("Invalid framework version in {path}: {source}")]
    Version {
        path: PathBuf,
        #[source]
        source: fxr_version::Error,
    },
}

impl Error {
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Route a version-crate error to the matching variant.
    pub(crate) fn from_version(path: impl Into<PathBuf>, source: fxr_version::Error) -> Self {
        match source {
            fxr_version::Error::InvalidVersion { .. }
            | fxr_version::Error::PrereleaseNotAllowed { .. } => Self::Version {
                path: path.into(),
                source,
            },
            _ => Self::Validation {
                path: path.into(),
                source,
            },
        }
    }

    /// True for errors caused by conflicting or unknown roll-forward values.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::Environment { .. })
    }
}

impl From<fxr_fs::Error> for Error {
    fn from(e: fxr_fs::Error) -> Self {
        match e {
            fxr_fs::Error::Io { path, source } => Self::Parse {
                path,
                message: source.to_string(),
            },
            fxr_fs::Error::JsonParse { path, message } => Self::Parse { path, message },
            fxr_fs::Error::NotAnObject { path } => Self::Parse {
                path,
                message: "root is not a JSON object".to_string(),
            },
        }
    }
}
