//! Roll-forward policy.
//!
//! Two spellings exist in configuration: the modern `rollForward` name and
//! the legacy `rollForwardOnNoCandidateFx` integer paired with
//! `applyPatches`. Both parse into [`RollForwardSpec`] and are normalized
//! into [`RollForwardSettings`] immediately, so nothing downstream cares
//! which spelling was used.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};
use crate::version::FxVersion;

/// How far an installed framework may drift from the requested version.
///
/// Variants are ordered from most to least restrictive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RollForwardPolicy {
    /// Only the exact requested version.
    Disabled,
    /// Latest patch of the requested `major.minor`.
    LatestPatch,
    /// Same `major.minor`, patches applied according to `applyPatches`.
    Minor,
    /// Latest version with the requested major.
    LatestMinor,
    /// Any version at or above the requested major.
    Major,
    /// Latest version overall.
    LatestMajor,
}

impl RollForwardPolicy {
    /// Policy applied when nothing configures one.
    pub const DEFAULT: Self = Self::Minor;

    /// Canonical configuration spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disabled => "Disable",
            Self::LatestPatch => "LatestPatch",
            Self::Minor => "Minor",
            Self::LatestMinor => "LatestMinor",
            Self::Major => "Major",
            Self::LatestMajor => "LatestMajor",
        }
    }

    /// Whether a candidate with a different minor than requested is admissible.
    pub fn allows_minor_roll(&self) -> bool {
        matches!(self, Self::LatestMinor | Self::Major | Self::LatestMajor)
    }

    /// Whether a candidate with a higher major than requested is admissible.
    pub fn allows_major_roll(&self) -> bool {
        matches!(self, Self::Major | Self::LatestMajor)
    }

    /// `Latest*` policies always take the greatest admissible version,
    /// ignoring `applyPatches`.
    pub fn always_latest(&self) -> bool {
        matches!(
            self,
            Self::LatestPatch | Self::LatestMinor | Self::LatestMajor
        )
    }

    /// Whether `candidate` may stand in for `requested` under this policy.
    ///
    /// Candidates below the requested version are never admissible.
    pub fn admits(&self, requested: &FxVersion, candidate: &FxVersion) -> bool {
        if candidate < requested {
            return false;
        }
        match self {
            Self::Disabled => candidate == requested,
            Self::LatestPatch | Self::Minor => candidate.same_feature_band(requested),
            Self::LatestMinor => candidate.major() == requested.major(),
            Self::Major | Self::LatestMajor => true,
        }
    }
}

impl fmt::Display for RollForwardPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RollForwardPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let policy = match s.to_ascii_lowercase().as_str() {
            "disable" | "disabled" => Self::Disabled,
            "latestpatch" => Self::LatestPatch,
            "minor" => Self::Minor,
            "latestminor" => Self::LatestMinor,
            "major" => Self::Major,
            "latestmajor" => Self::LatestMajor,
            _ => {
                return Err(Error::UnknownRollForward {
                    value: s.to_string(),
                });
            }
        };
        Ok(policy)
    }
}

impl Serialize for RollForwardPolicy {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RollForwardPolicy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// The legacy `rollForwardOnNoCandidateFx` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacyRollForward {
    Disabled = 0,
    Minor = 1,
    Major = 2,
}

impl LegacyRollForward {
    pub fn from_value(value: i64) -> Result<Self> {
        match value {
            0 => Ok(Self::Disabled),
            1 => Ok(Self::Minor),
            2 => Ok(Self::Major),
            _ => Err(Error::InvalidLegacyRollForward { value }),
        }
    }

    /// The modern policy this legacy value stands for.
    pub fn to_policy(self) -> RollForwardPolicy {
        match self {
            Self::Disabled => RollForwardPolicy::Disabled,
            Self::Minor => RollForwardPolicy::Minor,
            Self::Major => RollForwardPolicy::Major,
        }
    }
}

/// Roll-forward fields as written in one configuration scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RollForwardSpec {
    Legacy {
        on_no_candidate_fx: Option<LegacyRollForward>,
        apply_patches: Option<bool>,
    },
    Modern {
        roll_forward: RollForwardPolicy,
    },
}

impl RollForwardSpec {
    /// Build the spec for one scope from its raw fields.
    ///
    /// Returns `Ok(None)` when the scope sets nothing, and
    /// [`Error::ConflictingRollForward`] when both spellings are present.
    pub fn from_fields(
        scope: &str,
        roll_forward: Option<&str>,
        on_no_candidate_fx: Option<i64>,
        apply_patches: Option<bool>,
    ) -> Result<Option<Self>> {
        match (roll_forward, on_no_candidate_fx, apply_patches) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::ConflictingRollForward {
                scope: scope.to_string(),
            }),
            (Some(name), None, None) => Ok(Some(Self::Modern {
                roll_forward: name.parse()?,
            })),
            (None, None, None) => Ok(None),
            (None, legacy, apply_patches) => Ok(Some(Self::Legacy {
                on_no_candidate_fx: legacy.map(LegacyRollForward::from_value).transpose()?,
                apply_patches,
            })),
        }
    }
}

/// Roll-forward settings accumulated across configuration tiers.
///
/// Every field is optional so that a tier only overrides what it actually
/// sets; `effective_*` accessors fill in the built-in defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RollForwardSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<RollForwardPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub apply_patches: Option<bool>,
    /// Set when release requests may roll onto prerelease candidates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roll_to_prerelease: Option<bool>,
}

impl RollForwardSettings {
    /// Built-in defaults: `Minor` with patches applied.
    pub fn defaults() -> Self {
        Self {
            policy: Some(RollForwardPolicy::DEFAULT),
            apply_patches: Some(true),
            roll_to_prerelease: None,
        }
    }

    /// Apply one scope's spec on top of these settings.
    ///
    /// A legacy policy value implies `applyPatches = true` unless the same
    /// scope sets `applyPatches` explicitly; a modern policy always applies
    /// patches.
    pub fn apply_spec(&mut self, spec: &RollForwardSpec) {
        match *spec {
            RollForwardSpec::Modern { roll_forward } => {
                self.policy = Some(roll_forward);
                self.apply_patches = Some(true);
            }
            RollForwardSpec::Legacy {
                on_no_candidate_fx,
                apply_patches,
            } => {
                if let Some(legacy) = on_no_candidate_fx {
                    self.policy = Some(legacy.to_policy());
                    self.apply_patches = Some(apply_patches.unwrap_or(true));
                } else if apply_patches.is_some() {
                    self.apply_patches = apply_patches;
                }
            }
        }
    }

    /// Overlay `other` on these settings, field by field.
    pub fn merge(&mut self, other: &RollForwardSettings) {
        if other.policy.is_some() {
            self.policy = other.policy;
        }
        if other.apply_patches.is_some() {
            self.apply_patches = other.apply_patches;
        }
        if other.roll_to_prerelease.is_some() {
            self.roll_to_prerelease = other.roll_to_prerelease;
        }
    }

    pub fn effective_policy(&self) -> RollForwardPolicy {
        self.policy.unwrap_or(RollForwardPolicy::DEFAULT)
    }

    pub fn effective_apply_patches(&self) -> bool {
        self.apply_patches.unwrap_or(true)
    }

    pub fn effective_roll_to_prerelease(&self) -> bool {
        self.roll_to_prerelease.unwrap_or(false)
    }
}
