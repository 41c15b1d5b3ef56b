//! Environment snapshot consulted by configuration and probing.
//!
//! The environment is captured once per resolution request so that every
//! stage sees the same values and tests never touch process state.

use std::collections::BTreeMap;
use std::path::PathBuf;

use fxr_fs::split_path_list;
use fxr_version::{RollForwardSettings, RollForwardSpec};

use crate::error::{Error, Result};

/// Modern roll-forward policy name.
pub const ROLL_FORWARD: &str = "DOTNET_ROLL_FORWARD";
/// Legacy roll-forward integer (0, 1 or 2).
pub const ROLL_FORWARD_ON_NO_CANDIDATE_FX: &str = "DOTNET_ROLL_FORWARD_ON_NO_CANDIDATE_FX";
/// `1` lets release requests roll onto prerelease frameworks.
pub const ROLL_FORWARD_TO_PRERELEASE: &str = "DOTNET_ROLL_FORWARD_TO_PRERELEASE";
/// Path list of extra dependency manifests.
pub const ADDITIONAL_DEPS: &str = "DOTNET_ADDITIONAL_DEPS";
/// Path list of shared package stores.
pub const SHARED_STORE: &str = "DOTNET_SHARED_STORE";
/// Root of the servicing override directories.
pub const SERVICING: &str = "DOTNET_SERVICING";

const KNOWN_VARIABLES: &[&str] = &[
    ROLL_FORWARD,
    ROLL_FORWARD_ON_NO_CANDIDATE_FX,
    ROLL_FORWARD_TO_PRERELEASE,
    ADDITIONAL_DEPS,
    SHARED_STORE,
    SERVICING,
];

/// An immutable snapshot of the variables the resolver reads.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostEnvironment {
    vars: BTreeMap<String, String>,
}

impl HostEnvironment {
    /// An environment with no variables set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Capture the recognised variables from the current process.
    pub fn from_process() -> Self {
        let vars = KNOWN_VARIABLES
            .iter()
            .filter_map(|name| std::env::var(name).ok().map(|v| (name.to_string(), v)))
            .collect();
        Self { vars }
    }

    /// Builder-style setter.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Value of a variable; empty values read as unset.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    /// The environment's roll-forward tier.
    pub fn roll_forward_settings(&self) -> Result<RollForwardSettings> {
        let legacy = self
            .get(ROLL_FORWARD_ON_NO_CANDIDATE_FX)
            .map(|raw| {
                raw.trim().parse::<i64>().map_err(|_| Error::Environment {
                    variable: ROLL_FORWARD_ON_NO_CANDIDATE_FX.to_string(),
                    message: format!("'{raw}' is not an integer"),
                })
            })
            .transpose()?;

        let spec = RollForwardSpec::from_fields("environment", self.get(ROLL_FORWARD), legacy, None)
            .map_err(|e| {
                let variable = match &e {
                    fxr_version::Error::InvalidLegacyRollForward { .. } => {
                        ROLL_FORWARD_ON_NO_CANDIDATE_FX.to_string()
                    }
                    fxr_version::Error::ConflictingRollForward { .. } => {
                        format!("{ROLL_FORWARD} / {ROLL_FORWARD_ON_NO_CANDIDATE_FX}")
                    }
                    _ => ROLL_FORWARD.to_string(),
                };
                Error::Environment {
                    variable,
                    message: e.to_string(),
                }
            })?;

        let mut settings = RollForwardSettings::default();
        if let Some(spec) = spec {
            settings.apply_spec(&spec);
        }
        if let Some(value) = self.get(ROLL_FORWARD_TO_PRERELEASE) {
            settings.roll_to_prerelease = Some(value.trim() == "1");
        }
        Ok(settings)
    }

    /// Extra manifests from `DOTNET_ADDITIONAL_DEPS`.
    pub fn additional_deps(&self) -> Vec<PathBuf> {
        self.get(ADDITIONAL_DEPS)
            .map(split_path_list)
            .unwrap_or_default()
    }

    /// Store roots from `DOTNET_SHARED_STORE`.
    pub fn shared_stores(&self) -> Vec<PathBuf> {
        self.get(SHARED_STORE)
            .map(split_path_list)
            .unwrap_or_default()
    }

    /// Servicing root from `DOTNET_SERVICING`.
    pub fn servicing_root(&self) -> Option<PathBuf> {
        self.get(SERVICING).map(PathBuf::from)
    }
}
