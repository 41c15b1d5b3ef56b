//! Dependency manifest model
//!
//! A dependency manifest (`*.deps.json`) lists the libraries of one
//! deployable unit and, per target, the runtime/native/resource files each
//! library contributes. This crate parses that document, reconciles its
//! `targets` against `libraries`, and turns the result into
//! [`ManifestEntry`] values for the probe pipeline after choosing the
//! best RID-specific assets for the host.
//!
//! # Example manifest
//!
//! ```json
//! {
//!   "runtimeTarget": { "name": ".NETCoreApp,Version=v2.1" },
//!   "targets": {
//!     ".NETCoreApp,Version=v2.1": {
//!       "Foo/1.0.0": {
//!         "runtime": { "lib/netstandard2.0/Foo.dll": {} },
//!         "runtimeTargets": {
//!           "runtimes/linux/native/libfoo.so": { "rid": "linux", "assetType": "native" }
//!         }
//!       }
//!     }
//!   },
//!   "libraries": {
//!     "Foo/1.0.0": { "type": "package", "serviceable": true, "path": "foo/1.0.0" }
//!   },
//!   "runtimes": { "linux-x64": ["linux", "unix", "any", "base"] }
//! }
//! ```

pub mod asset;
pub mod entry;
pub mod error;
pub mod fallback;
pub mod library;
pub mod manifest;
pub mod rid;

/// File name marking an intentionally empty package folder.
pub const PLACEHOLDER_FILE_NAME: &str = "_._";

pub use asset::{AssetSet, AssetType};
pub use entry::ManifestEntry;
pub use error::{Error, Result};
pub use fallback::RidSelection;
pub use library::{Library, LibraryKey};
pub use manifest::DependencyManifest;
pub use rid::{RidFallbackGraph, current_rid};
