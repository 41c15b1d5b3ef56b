//! Library identity and metadata.

use std::fmt;

use serde::Serialize;

/// `name/version` identity of a library, as used for manifest keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LibraryKey {
    pub name: String,
    pub version: String,
}

impl LibraryKey {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    /// Split a manifest key of the form `Name/Version`.
    pub fn parse(key: &str) -> Option<Self> {
        let (name, version) = key.split_once('/')?;
        if name.is_empty() || version.is_empty() {
            return None;
        }
        Some(Self::new(name, version))
    }

    /// Package-layout directory used when a library declares no `path`:
    /// the lowercased name and version.
    pub fn default_package_path(&self) -> String {
        format!(
            "{}/{}",
            self.name.to_lowercase(),
            self.version.to_lowercase()
        )
    }
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.name, self.version)
    }
}

/// One `libraries` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Library {
    /// `package`, `project`, `reference`, ...
    pub library_type: String,
    pub serviceable: bool,
    pub content_hash: Option<String>,
    /// Relative directory in package-layout probe locations.
    pub path: Option<String>,
    pub hash_path: Option<String>,
}
