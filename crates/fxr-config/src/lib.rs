//! Runtime configuration layering
//!
//! Parses `*.runtimeconfig.json` (and its `*.runtimeconfig.dev.json`
//! companion) into a [`RuntimeConfig`], producing one effective
//! [`FrameworkReference`](fxr_version::FrameworkReference) per declared
//! framework.
//!
//! # Precedence
//!
//! Roll-forward settings are merged field by field, later tiers winning:
//!
//! 1. **Defaults** - built-in `Minor` + `applyPatches`, or the settings
//!    inherited from the referencing layer
//! 2. **Environment** - `DOTNET_ROLL_FORWARD` and friends
//! 3. **File options** - top-level `runtimeOptions` fields
//! 4. **Framework entry** - fields inside each `framework`/`frameworks`
//!    entry, after which the environment is applied once more
//! 5. **Caller overrides** - [`OverrideSettings`], final

mod value;

pub mod env;
pub mod error;
pub mod overrides;
pub mod properties;
pub mod runtime_config;

pub use env::HostEnvironment;
pub use error::{Error, Result};
pub use overrides::OverrideSettings;
pub use properties::merge_properties;
pub use runtime_config::{IncludedFramework, RuntimeConfig};
