//! Framework version model and roll-forward policy.
//!
//! This crate is the leaf of the resolver: every other crate orders,
//! compares, and admits framework versions through the types here.
//!
//! # Examples
//!
//! ```
//! use fxr_version::{FxVersion, RollForwardPolicy};
//!
//! let requested = FxVersion::parse("2.1.0", false).unwrap();
//! let candidate = FxVersion::parse("2.1.3", false).unwrap();
//! assert!(RollForwardPolicy::Minor.admits(&requested, &candidate));
//! assert!(!RollForwardPolicy::Disabled.admits(&requested, &candidate));
//! ```

pub mod error;
pub mod reference;
pub mod roll_forward;
pub mod version;

pub use error::{Error, Result};
pub use reference::FrameworkReference;
pub use roll_forward::{LegacyRollForward, RollForwardPolicy, RollForwardSettings, RollForwardSpec};
pub use version::FxVersion;
