//! Framework resolution and asset probing
//!
//! Given an application and the host it runs on, this crate decides which
//! shared framework versions to load and where every assembly, native
//! library and resource comes from.
//!
//! # Stages
//!
//! 1. [`RuntimeConfig`](fxr_config::RuntimeConfig) parsing produces one
//!    framework reference per declared framework.
//! 2. [`FrameworkResolver`] walks the framework chain, picking an installed
//!    version for every layer under its roll-forward policy.
//! 3. Each layer's [`DependencyManifest`](fxr_deps::DependencyManifest) is
//!    expanded into entries for the host RID.
//! 4. [`ProbePipeline`] locates every entry and builds the TPA list and the
//!    native and resource search directories.
//!
//! [`resolve`] runs all four for one [`ResolveRequest`] against a
//! caller-owned [`HostContext`].
//!
//! # Example
//!
//! ```no_run
//! use fxr_core::{HostContext, ResolveRequest, resolve};
//! use fxr_fs::HostFs;
//!
//! let ctx = HostContext::new(HostFs, "/usr/share/dotnet");
//! let request = ResolveRequest::new("/apps/hello/Hello.dll");
//! let paths = resolve(&ctx, &request)?;
//! for fx in &paths.frameworks {
//!     println!("{} {}", fx.name, fx.resolved_version);
//! }
//! # Ok::<(), fxr_core::Error>(())
//! ```

pub mod context;
pub mod error;
pub mod framework;
pub mod probe;
pub mod resolve;

pub use context::HostContext;
pub use error::{Error, ErrorKind, Result};
pub use framework::{
    FrameworkDefinition, FrameworkResolver, InstalledFramework, ResolvedFramework,
    did_roll_forward_across_minor_or_major,
};
pub use probe::{ManifestOrigin, ManifestSource, ProbeKind, ProbeLocation, ProbePipeline, ResolvedAssets};
pub use resolve::{ResolveRequest, ResolvedPaths, resolve};
