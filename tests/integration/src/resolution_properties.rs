//! Framework selection checked against randomly populated installs.

use std::collections::BTreeSet;

use fxr_core::{ErrorKind, FrameworkResolver, HostContext};
use fxr_fs::HostFs;
use fxr_test_utils::TestInstall;
use fxr_version::{FrameworkReference, FxVersion, RollForwardPolicy, RollForwardSettings};
use proptest::prelude::*;

fn versions() -> impl Strategy<Value = BTreeSet<(u64, u64, u64)>> {
    prop::collection::btree_set((1u64..4, 0u64..3, 0u64..4), 1..6)
}

fn reference(requested: (u64, u64, u64), policy: RollForwardPolicy) -> FrameworkReference {
    reference_with_patches(requested, policy, true)
}

fn reference_with_patches(
    requested: (u64, u64, u64),
    policy: RollForwardPolicy,
    apply_patches: bool,
) -> FrameworkReference {
    let settings = RollForwardSettings {
        policy: Some(policy),
        apply_patches: Some(apply_patches),
        roll_to_prerelease: None,
    };
    let version = FxVersion::parse_production(&format!(
        "{}.{}.{}",
        requested.0, requested.1, requested.2
    ))
    .unwrap();
    FrameworkReference::new("Test.App", version, &settings)
}

fn install_with(installed: &BTreeSet<(u64, u64, u64)>) -> TestInstall {
    let install = TestInstall::new();
    for (major, minor, patch) in installed {
        install.add_framework("Test.App", &format!("{major}.{minor}.{patch}"));
    }
    install
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn latest_major_takes_greatest_at_or_above_request(
        installed in versions(),
        requested in (1u64..4, 0u64..3, 0u64..4),
    ) {
        let install = install_with(&installed);
        let ctx = HostContext::new(HostFs, install.dotnet_root());
        let result = FrameworkResolver::new(&ctx)
            .resolve(&reference(requested, RollForwardPolicy::LatestMajor));

        match installed.iter().filter(|v| **v >= requested).max() {
            Some((major, minor, patch)) => {
                let resolved = result.unwrap();
                prop_assert_eq!(
                    resolved.resolved_version.to_string(),
                    format!("{major}.{minor}.{patch}")
                );
            }
            None => prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::FrameworkNotFound),
        }
    }

    #[test]
    fn latest_patch_never_leaves_feature_band(
        installed in versions(),
        requested in (1u64..4, 0u64..3, 0u64..4),
    ) {
        let install = install_with(&installed);
        let ctx = HostContext::new(HostFs, install.dotnet_root());
        let result = FrameworkResolver::new(&ctx)
            .resolve(&reference(requested, RollForwardPolicy::LatestPatch));

        let expected = installed
            .iter()
            .filter(|(major, minor, patch)| {
                *major == requested.0 && *minor == requested.1 && *patch >= requested.2
            })
            .max();
        match expected {
            Some((major, minor, patch)) => {
                let resolved = result.unwrap();
                prop_assert_eq!(
                    resolved.resolved_version.to_string(),
                    format!("{major}.{minor}.{patch}")
                );
                prop_assert!(!resolved.rolled_forward_across_minor_or_major);
            }
            None => prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::FrameworkNotFound),
        }
    }

    #[test]
    fn minor_never_changes_major_and_takes_greatest_in_band(
        installed in versions(),
        requested in (1u64..4, 0u64..3, 0u64..4),
    ) {
        let install = install_with(&installed);
        let ctx = HostContext::new(HostFs, install.dotnet_root());
        let result = FrameworkResolver::new(&ctx)
            .resolve(&reference(requested, RollForwardPolicy::Minor));

        let expected = installed
            .iter()
            .filter(|v| v.0 == requested.0 && v.1 == requested.1 && **v >= requested)
            .max();
        match expected {
            Some((major, minor, patch)) => {
                let resolved = result.unwrap();
                prop_assert_eq!(resolved.resolved_version.major(), requested.0);
                prop_assert_eq!(
                    resolved.resolved_version.to_string(),
                    format!("{major}.{minor}.{patch}")
                );
            }
            None => prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::FrameworkNotFound),
        }
    }

    #[test]
    fn minor_without_patches_takes_lowest_in_band(
        installed in versions(),
        requested in (1u64..4, 0u64..3, 0u64..4),
    ) {
        let install = install_with(&installed);
        let ctx = HostContext::new(HostFs, install.dotnet_root());
        let result = FrameworkResolver::new(&ctx)
            .resolve(&reference_with_patches(requested, RollForwardPolicy::Minor, false));

        let expected = installed
            .iter()
            .filter(|v| v.0 == requested.0 && v.1 == requested.1 && **v >= requested)
            .min();
        match expected {
            Some((major, minor, patch)) => {
                let resolved = result.unwrap();
                prop_assert_eq!(resolved.resolved_version.major(), requested.0);
                prop_assert_eq!(
                    resolved.resolved_version.to_string(),
                    format!("{major}.{minor}.{patch}")
                );
            }
            None => prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::FrameworkNotFound),
        }
    }

    #[test]
    fn disabled_resolves_only_the_exact_version(
        installed in versions(),
        requested in (1u64..4, 0u64..3, 0u64..4),
    ) {
        let install = install_with(&installed);
        let ctx = HostContext::new(HostFs, install.dotnet_root());
        let result = FrameworkResolver::new(&ctx)
            .resolve(&reference(requested, RollForwardPolicy::Disabled));

        prop_assert_eq!(result.is_ok(), installed.contains(&requested));
    }
}
