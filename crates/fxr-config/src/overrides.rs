//! Caller-supplied settings that no configuration tier can override.

use std::path::PathBuf;

use fxr_version::{FxVersion, RollForwardPolicy, RollForwardSettings};
use serde::{Deserialize, Serialize};

/// Overrides handed in by the caller, e.g. diagnostics tooling pinning an
/// exact framework version.
///
/// Deserializable so front ends can load it from a settings file:
///
/// ```toml
/// roll_forward = "LatestMinor"
/// fx_version = "2.1.3"
/// additional_probing_paths = ["/opt/packages"]
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OverrideSettings {
    pub roll_forward: Option<RollForwardPolicy>,
    pub apply_patches: Option<bool>,
    pub roll_to_prerelease: Option<bool>,
    /// Exact framework version to use; implies no roll-forward.
    pub fx_version: Option<FxVersion>,
    /// Framework `fx_version` applies to; the first declared framework when
    /// unset.
    pub fx_name: Option<String>,
    /// Probe directories consulted before those from configuration files.
    pub additional_probing_paths: Vec<PathBuf>,
}

impl OverrideSettings {
    /// The roll-forward tier these overrides contribute.
    pub fn roll_forward_settings(&self) -> RollForwardSettings {
        RollForwardSettings {
            policy: self.roll_forward,
            apply_patches: self.apply_patches,
            roll_to_prerelease: self.roll_to_prerelease,
        }
    }

    /// Whether the pinned version applies to the framework at `index`
    /// named `name`.
    pub(crate) fn pins(&self, index: usize, name: &str) -> Option<&FxVersion> {
        let version = self.fx_version.as_ref()?;
        let applies = match &self.fx_name {
            Some(target) => target == name,
            None => index == 0,
        };
        applies.then_some(version)
    }
}
