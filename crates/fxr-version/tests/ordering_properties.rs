//! Property tests for version ordering and settings merges.

use fxr_version::{FxVersion, RollForwardPolicy, RollForwardSettings};
use proptest::prelude::*;
use std::cmp::Ordering;

fn version_strategy() -> impl Strategy<Value = String> {
    (
        0u64..20,
        0u64..20,
        0u64..20,
        proptest::option::of("[a-z]{1,6}(\\.[1-9][0-9]{0,2}){0,2}"),
        proptest::option::of("[a-z0-9]{1,6}"),
    )
        .prop_map(|(major, minor, patch, pre, build)| {
            let mut text = format!("{major}.{minor}.{patch}");
            if let Some(pre) = pre {
                text.push('-');
                text.push_str(&pre);
            }
            if let Some(build) = build {
                text.push('+');
                text.push_str(&build);
            }
            text
        })
}

fn policy_strategy() -> impl Strategy<Value = Option<RollForwardPolicy>> {
    proptest::option::of(prop_oneof![
        Just(RollForwardPolicy::Disabled),
        Just(RollForwardPolicy::LatestPatch),
        Just(RollForwardPolicy::Minor),
        Just(RollForwardPolicy::LatestMinor),
        Just(RollForwardPolicy::Major),
        Just(RollForwardPolicy::LatestMajor),
    ])
}

fn settings_strategy() -> impl Strategy<Value = RollForwardSettings> {
    (
        policy_strategy(),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
    )
        .prop_map(|(policy, apply_patches, roll_to_prerelease)| RollForwardSettings {
            policy,
            apply_patches,
            roll_to_prerelease,
        })
}

proptest! {
    #[test]
    fn compare_is_antisymmetric(a in version_strategy(), b in version_strategy()) {
        let a = FxVersion::parse(&a, false).unwrap();
        let b = FxVersion::parse(&b, false).unwrap();
        prop_assert_eq!(FxVersion::compare(&a, &b), FxVersion::compare(&b, &a).reverse());
        prop_assert_eq!(a == b, FxVersion::compare(&a, &b) == Ordering::Equal);
    }

    #[test]
    fn compare_is_transitive(a in version_strategy(), b in version_strategy(), c in version_strategy()) {
        let mut versions = [a, b, c].map(|s| FxVersion::parse(&s, false).unwrap());
        versions.sort();
        prop_assert!(versions[0] <= versions[2]);
    }

    #[test]
    fn display_preserves_components(text in version_strategy()) {
        let version = FxVersion::parse(&text, false).unwrap();
        let printed = version.to_string();
        prop_assert_eq!(&printed, &text);
        let reparsed = FxVersion::parse(&printed, false).unwrap();
        prop_assert_eq!(reparsed.major(), version.major());
        prop_assert_eq!(reparsed.minor(), version.minor());
        prop_assert_eq!(reparsed.patch(), version.patch());
        prop_assert_eq!(reparsed.prerelease(), version.prerelease());
        prop_assert_eq!(reparsed.build(), version.build());
    }

    #[test]
    fn merging_a_tier_twice_is_idempotent(base in settings_strategy(), tier in settings_strategy()) {
        let mut once = base;
        once.merge(&tier);
        let mut twice = once;
        twice.merge(&tier);
        prop_assert_eq!(once, twice);
    }
}
