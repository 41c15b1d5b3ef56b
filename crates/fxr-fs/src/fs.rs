//! The filesystem seam used by every resolver stage.
//!
//! Probing never distinguishes "exists but unreadable" from "absent": every
//! query here swallows I/O failures and answers in the negative.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Filesystem primitives consumed by the resolver.
pub trait FileSystem {
    /// True if `path` names an existing regular file.
    fn file_exists(&self, path: &Path) -> bool;

    /// True if `path` names an existing directory.
    fn directory_exists(&self, path: &Path) -> bool;

    /// Names (not paths) of the entries directly beneath `path`, sorted.
    /// An unreadable or missing directory yields an empty list.
    fn list_entries(&self, path: &Path) -> Vec<String>;

    /// Resolve symlinks and normalize `path`. Falls back to the input when
    /// the path cannot be resolved.
    fn realpath(&self, path: &Path) -> PathBuf;

    /// Read a whole file as UTF-8.
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Names of the subdirectories directly beneath `path`, sorted.
    fn list_directories(&self, path: &Path) -> Vec<String> {
        self.list_entries(path)
            .into_iter()
            .filter(|name| self.directory_exists(&path.join(name)))
            .collect()
    }
}

impl<T: FileSystem + ?Sized> FileSystem for &T {
    fn file_exists(&self, path: &Path) -> bool {
        (**self).file_exists(path)
    }

    fn directory_exists(&self, path: &Path) -> bool {
        (**self).directory_exists(path)
    }

    fn list_entries(&self, path: &Path) -> Vec<String> {
        (**self).list_entries(path)
    }

    fn realpath(&self, path: &Path) -> PathBuf {
        (**self).realpath(path)
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        (**self).read_to_string(path)
    }
}

/// [`FileSystem`] backed by the host operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFs;

impl FileSystem for HostFs {
    fn file_exists(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn directory_exists(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_entries(&self, path: &Path) -> Vec<String> {
        let entries = match fs::read_dir(path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::trace!(?path, error = %e, "Directory not listable");
                return Vec::new();
            }
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
            .collect();
        names.sort();
        names
    }

    fn realpath(&self, path: &Path) -> PathBuf {
        dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
    }

    fn read_to_string(&self, path: &Path) -> Result<String> {
        fs::read_to_string(path).map_err(|e| Error::io(path, e))
    }
}

/// Split a `PATH`-style list using the platform separator, dropping empty
/// segments.
pub fn split_path_list(value: impl AsRef<OsStr>) -> Vec<PathBuf> {
    std::env::split_paths(value.as_ref())
        .filter(|p| !p.as_os_str().is_empty())
        .collect()
}
