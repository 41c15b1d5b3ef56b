//! Error types for fxr-core

use std::fmt;

/// Result type for resolution
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of every resolution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    ConfigParse,
    ConfigValidation,
    VersionParse,
    FrameworkNotFound,
    ManifestParse,
    AssetNotFound,
    Io,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigParse => "ConfigParse",
            Self::ConfigValidation => "ConfigValidation",
            Self::VersionParse => "VersionParse",
            Self::FrameworkNotFound => "FrameworkNotFound",
            Self::ManifestParse => "ManifestParse",
            Self::AssetNotFound => "AssetNotFound",
            Self::Io => "Io",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that abort a resolution
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No installed version satisfies the framework reference
    #[error(
        "Framework '{name}' version {version} (rollForward={policy}) was not found{}",
        installed_suffix(.installed)
    )]
    FrameworkNotFound {
        name: String,
        version: String,
        policy: String,
        installed: Vec<String>,
    },

    /// A manifest entry resolved in no probe location
    #[error("Asset '{relative_path}' of library '{library}/{version}' was not found in any probe location")]
    AssetNotFound {
        library: String,
        version: String,
        relative_path: String,
    },

    /// Host runtime identifier that cannot select assets
    #[error("Invalid runtime identifier '{rid}'")]
    InvalidRid { rid: String },

    // Transparent wrappers for underlying crate errors
    /// Runtime configuration error from fxr-config
    #[error(transparent)]
    Config(#[from] fxr_config::Error),

    /// Dependency manifest error from fxr-deps
    #[error(transparent)]
    Manifest(#[from] fxr_deps::Error),

    /// Version or roll-forward error from fxr-version
    #[error(transparent)]
    Version(#[from] fxr_version::Error),

    /// Filesystem error from fxr-fs
    #[error(transparent)]
    Fs(#[from] fxr_fs::Error),
}

fn installed_suffix(installed: &[String]) -> String {
    if installed.is_empty() {
        String::new()
    } else {
        format!("; installed versions: {}", installed.join(", "))
    }
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FrameworkNotFound { .. } => ErrorKind::FrameworkNotFound,
            Self::AssetNotFound { .. } => ErrorKind::AssetNotFound,
            Self::InvalidRid { .. } => ErrorKind::ConfigValidation,
            Self::Config(fxr_config::Error::Version { .. }) => ErrorKind::VersionParse,
            Self::Config(e) if e.is_validation() => ErrorKind::ConfigValidation,
            Self::Config(_) => ErrorKind::ConfigParse,
            Self::Manifest(_) => ErrorKind::ManifestParse,
            Self::Version(
                fxr_version::Error::InvalidVersion { .. }
                | fxr_version::Error::PrereleaseNotAllowed { .. },
            ) => ErrorKind::VersionParse,
            Self::Version(_) => ErrorKind::ConfigValidation,
            Self::Fs(_) => ErrorKind::Io,
        }
    }
}
