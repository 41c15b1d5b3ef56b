//! Command implementations for fxr-cli

pub mod frameworks;
pub mod resolve;
pub mod rids;

pub use frameworks::run_frameworks;
pub use resolve::{ResolveArgs, run_resolve};
pub use rids::run_rids;
