//! Error types for fxr-fs

use std::path::PathBuf;

/// Result type for fxr-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in fxr-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON document at {path}: {message}")]
    JsonParse { path: PathBuf, message: String },

    #[error("Expected a JSON object at the root of {path}")]
    NotAnObject { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
