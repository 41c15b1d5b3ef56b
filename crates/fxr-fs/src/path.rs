//! Normalized path handling for probe bookkeeping

use std::path::Path;

/// A path normalized to use forward slashes internally.
///
/// Used as a comparison key: deduplicating search directories and testing
/// whether a resolved file lives under the servicing root both need a form
/// that does not depend on the platform separator or on trailing slashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NormalizedPath {
    /// Internal representation always uses forward slashes
    inner: String,
}

impl NormalizedPath {
    /// Converts backslashes to forward slashes and drops trailing slashes
    /// (except for a bare root).
    pub fn new(path: impl AsRef<Path>) -> Self {
        let path_str = path.as_ref().to_string_lossy();
        let mut normalized = path_str.replace('\\', "/");
        while normalized.len() > 1 && normalized.ends_with('/') {
            normalized.pop();
        }
        Self { inner: normalized }
    }

    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Component-wise prefix test; `/a/bc` does not start with `/a/b`.
    pub fn starts_with(&self, base: &NormalizedPath) -> bool {
        if base.inner == "/" {
            return self.inner.starts_with('/');
        }
        match self.inner.strip_prefix(&base.inner) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }
}
