use std::path::PathBuf;

/// Errors that invalidate a dependency manifest.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed JSON or a structurally invalid section.
    #[error("Failed to parse dependency manifest {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A library entry lacks a field every library must carry.
    #[error("Library '{library}' in {path} is missing required field '{field}'")]
    MissingField {
        path: PathBuf,
        library: String,
        field: &'static str,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
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
