/// Errors produced while parsing versions and roll-forward settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The text is not a `major.minor.patch[-pre][+build]` version.
    #[error("invalid version '{version}': {reason}")]
    InvalidVersion { version: String, reason: String },

    /// A prerelease version was found where only production versions count.
    #[error("version '{version}' is a prerelease")]
    PrereleaseNotAllowed { version: String },

    /// Unrecognised `rollForward` policy name.
    #[error("unknown roll-forward policy '{value}'")]
    UnknownRollForward { value: String },

    /// Unrecognised legacy `rollForwardOnNoCandidateFx` value.
    #[error("invalid rollForwardOnNoCandidateFx value {value} (expected 0, 1 or 2)")]
    InvalidLegacyRollForward { value: i64 },

    /// Both the legacy and the modern roll-forward spellings were set in
    /// one scope.
    #[error(
        "{scope}: rollForward cannot be combined with rollForwardOnNoCandidateFx or applyPatches"
    )]
    ConflictingRollForward { scope: String },
}

pub type Result<T> = std::result::Result<T, Error>;
