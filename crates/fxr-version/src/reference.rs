//! A reference from an app (or framework) to a shared framework.

use serde::Serialize;

use crate::roll_forward::{RollForwardPolicy, RollForwardSettings};
use crate::version::FxVersion;

/// One shared-framework dependency with its effective roll-forward rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkReference {
    pub name: String,
    pub requested_version: FxVersion,
    pub policy: RollForwardPolicy,
    pub apply_patches: bool,
    /// Release requests avoid prerelease candidates while a release
    /// candidate is admissible.
    pub prefer_release: bool,
    /// Pins resolution to the requested version regardless of policy.
    pub use_exact_version: bool,
}

impl FrameworkReference {
    /// Build a reference from fully merged settings.
    pub fn new(
        name: impl Into<String>,
        requested_version: FxVersion,
        settings: &RollForwardSettings,
    ) -> Self {
        let prefer_release =
            !requested_version.is_prerelease() && !settings.effective_roll_to_prerelease();
        Self {
            name: name.into(),
            requested_version,
            policy: settings.effective_policy(),
            apply_patches: settings.effective_apply_patches(),
            prefer_release,
            use_exact_version: false,
        }
    }

    /// Policy after `use_exact_version` is taken into account.
    pub fn effective_policy(&self) -> RollForwardPolicy {
        if self.use_exact_version {
            RollForwardPolicy::Disabled
        } else {
            self.policy
        }
    }

    /// Fold a second reference to the same framework into this one.
    ///
    /// The higher requested version and the more restrictive policy win;
    /// `applyPatches` and `preferRelease` must both hold; exactness from
    /// either side sticks. Returns whether anything changed.
    pub fn merge_with(&mut self, other: &FrameworkReference) -> bool {
        debug_assert_eq!(self.name, other.name);
        let before = self.clone();

        if other.requested_version > self.requested_version {
            self.requested_version = other.requested_version.clone();
        }
        self.policy = self.policy.min(other.policy);
        self.apply_patches &= other.apply_patches;
        self.prefer_release &= other.prefer_release;
        self.use_exact_version |= other.use_exact_version;

        *self != before
    }

    /// Whether resolution must find the requested version verbatim.
    ///
    /// Prerelease requests never roll forward.
    pub fn requires_exact_match(&self) -> bool {
        self.effective_policy() == RollForwardPolicy::Disabled
            || self.requested_version.is_prerelease()
    }

    /// Pick the best installed version for this reference.
    ///
    /// Release candidates are preferred while `prefer_release` holds and one
    /// is admissible. `Latest*` policies and `applyPatches` take the greatest
    /// admissible version; otherwise the lowest one wins.
    pub fn select<'a, I>(&self, candidates: I) -> Option<&'a FxVersion>
    where
        I: IntoIterator<Item = &'a FxVersion>,
    {
        let policy = self.effective_policy();
        let exact = self.requires_exact_match();
        let admissible: Vec<&FxVersion> = candidates
            .into_iter()
            .filter(|c| {
                if exact {
                    **c == self.requested_version
                } else {
                    policy.admits(&self.requested_version, c)
                }
            })
            .collect();

        let pool: Vec<&FxVersion> =
            if self.prefer_release && admissible.iter().any(|v| !v.is_prerelease()) {
                admissible.into_iter().filter(|v| !v.is_prerelease()).collect()
            } else {
                admissible
            };

        if policy.always_latest() || self.apply_patches {
            pool.into_iter().max()
        } else {
            pool.into_iter().min()
        }
    }
}

impl std::fmt::Display for FrameworkReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} (rollForward={}",
            self.name,
            self.requested_version,
            self.effective_policy()
        )?;
        if !self.apply_patches {
            f.write_str(", applyPatches=false")?;
        }
        f.write_str(")")
    }
}
