//! Framework versions.
//!
//! A framework version is `major.minor.patch` with optional prerelease and
//! build tags, following the semver grammar. Ordering follows semver
//! precedence, with one deliberate difference from [`semver::Version`]:
//! build metadata never participates in ordering or equality.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use semver::{BuildMetadata, Prerelease};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A parsed framework version.
#[derive(Debug, Clone)]
pub struct FxVersion {
    major: u64,
    minor: u64,
    patch: u64,
    pre: Prerelease,
    build: BuildMetadata,
}

impl FxVersion {
    /// Create a release version with no tags.
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: Prerelease::EMPTY,
            build: BuildMetadata::EMPTY,
        }
    }

    /// Parse a version string.
    ///
    /// With `production_only` set, a version carrying a prerelease tag is
    /// rejected instead of being accepted.
    pub fn parse(text: &str, production_only: bool) -> Result<Self> {
        let parsed = semver::Version::parse(text).map_err(|e| Error::InvalidVersion {
            version: text.to_string(),
            reason: e.to_string(),
        })?;

        if production_only && !parsed.pre.is_empty() {
            return Err(Error::PrereleaseNotAllowed {
                version: text.to_string(),
            });
        }

        Ok(Self {
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            pre: parsed.pre,
            build: parsed.build,
        })
    }

    /// Parse a version that must not be a prerelease.
    pub fn parse_production(text: &str) -> Result<Self> {
        Self::parse(text, true)
    }

    pub fn major(&self) -> u64 {
        self.major
    }

    pub fn minor(&self) -> u64 {
        self.minor
    }

    pub fn patch(&self) -> u64 {
        self.patch
    }

    /// Prerelease tag without the leading `-`, empty for releases.
    pub fn prerelease(&self) -> &str {
        self.pre.as_str()
    }

    /// Build metadata without the leading `+`, empty if absent.
    pub fn build(&self) -> &str {
        self.build.as_str()
    }

    pub fn is_prerelease(&self) -> bool {
        !self.pre.is_empty()
    }

    /// True when both versions share `major.minor`.
    pub fn same_feature_band(&self, other: &FxVersion) -> bool {
        self.major == other.major && self.minor == other.minor
    }

    /// Same feature band and neither side a prerelease.
    pub fn is_compatible_patch(&self, other: &FxVersion) -> bool {
        self.same_feature_band(other) && !self.is_prerelease() && !other.is_prerelease()
    }

    /// Total order used by framework resolution.
    pub fn compare(a: &FxVersion, b: &FxVersion) -> Ordering {
        a.major
            .cmp(&b.major)
            .then(a.minor.cmp(&b.minor))
            .then(a.patch.cmp(&b.patch))
            .then_with(|| a.pre.cmp(&b.pre))
    }
}

impl PartialEq for FxVersion {
    fn eq(&self, other: &Self) -> bool {
        Self::compare(self, other) == Ordering::Equal
    }
}

impl Eq for FxVersion {}

impl PartialOrd for FxVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FxVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        Self::compare(self, other)
    }
}

impl Hash for FxVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.pre.hash(state);
    }
}

impl fmt::Display for FxVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if !self.pre.is_empty() {
            write!(f, "-{}", self.pre)?;
        }
        if !self.build.is_empty() {
            write!(f, "+{}", self.build)?;
        }
        Ok(())
    }
}

impl FromStr for FxVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, false)
    }
}

impl Serialize for FxVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FxVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text, false).map_err(serde::de::Error::custom)
    }
}
