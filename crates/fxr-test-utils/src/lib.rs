//! Shared test utilities for the framework resolver workspace.
//!
//! Dev-dependency only, never published. [`TestInstall`] lays out a fake
//! runtime install and application in a temporary directory.

mod install;

pub use install::TestInstall;
