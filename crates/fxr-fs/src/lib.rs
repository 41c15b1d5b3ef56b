//! Filesystem abstraction for the framework resolver
//!
//! Every probe in the resolver goes through the [`FileSystem`] trait so that
//! existence checks, directory listings, and symlink resolution share one
//! set of semantics: failures read as "absent", never as errors.

pub mod constants;
pub mod error;
pub mod fs;
pub mod json;
pub mod path;

pub use constants::HostFile;
pub use error::{Error, Result};
pub use fs::{FileSystem, HostFs, split_path_list};
pub use json::read_json;
pub use path::NormalizedPath;
