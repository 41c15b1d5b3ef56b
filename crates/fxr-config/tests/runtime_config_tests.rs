//! Tests for runtime configuration parsing and tier precedence

use fxr_config::env::{ROLL_FORWARD, ROLL_FORWARD_ON_NO_CANDIDATE_FX};
use fxr_config::{Error, HostEnvironment, OverrideSettings, RuntimeConfig, merge_properties};
use fxr_fs::HostFs;
use fxr_version::{FxVersion, RollForwardPolicy, RollForwardSettings};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

fn parse(path: &Path) -> fxr_config::Result<RuntimeConfig> {
    RuntimeConfig::parse(&HostFs, path, None, None, None, &HostEnvironment::empty())
}

mod parsing {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_file_yields_defaults() {
        let temp = TempDir::new().unwrap();
        let config = parse(&temp.path().join("App.runtimeconfig.json")).unwrap();

        assert!(!config.exists());
        assert!(!config.is_framework_dependent());
        assert_eq!(config.settings().effective_policy(), RollForwardPolicy::Minor);
        assert!(config.settings().effective_apply_patches());
    }

    #[test]
    fn single_framework_object() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{
  "runtimeOptions": {
    "tfm": "netcoreapp2.1",
    "framework": { "name": "Test.App", "version": "2.1.0" }
  }
}"#,
        );

        let config = parse(&path).unwrap();
        assert!(config.exists());
        assert_eq!(config.tfm(), Some("netcoreapp2.1"));
        assert_eq!(config.frameworks().len(), 1);

        let fx = &config.frameworks()[0];
        assert_eq!(fx.name, "Test.App");
        assert_eq!(fx.requested_version, FxVersion::new(2, 1, 0));
        assert_eq!(fx.policy, RollForwardPolicy::Minor);
        assert!(fx.apply_patches);
        assert!(fx.prefer_release);
        assert!(!fx.use_exact_version);
    }

    #[test]
    fn frameworks_array_keeps_declaration_order() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{
  "runtimeOptions": {
    "frameworks": [
      { "name": "Test.Web", "version": "2.1.0" },
      { "name": "Test.App", "version": "2.1.0" }
    ]
  }
}"#,
        );

        let config = parse(&path).unwrap();
        let names: Vec<&str> = config.frameworks().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Test.Web", "Test.App"]);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "App.runtimeconfig.json", "{ \"runtimeOptions\": ");

        assert!(matches!(parse(&path), Err(Error::Parse { .. })));
    }

    #[rstest]
    #[case(r#"{"runtimeOptions": {"framework": {"version": "2.1.0"}}}"#)]
    #[case(r#"{"runtimeOptions": {"framework": {"name": "Test.App"}}}"#)]
    #[case(r#"{"runtimeOptions": {"framework": {"name": "A", "version": "1.0.0"}, "frameworks": []}}"#)]
    #[case(r#"{"runtimeOptions": {"frameworks": [{"name": "A", "version": "1.0.0"}, {"name": "A", "version": "1.0.0"}]}}"#)]
    #[case(r#"{"runtimeOptions": {"configProperties": {"x": [1, 2]}}}"#)]
    #[case(r#"{"runtimeOptions": {"rollForward": 2}}"#)]
    fn structural_problems_are_parse_errors(#[case] content: &str) {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "App.runtimeconfig.json", content);

        assert!(matches!(parse(&path), Err(Error::Parse { .. })));
    }

    #[test]
    fn bad_version_is_a_version_error() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"framework": {"name": "Test.App", "version": "2.1"}}}"#,
        );

        assert!(matches!(parse(&path), Err(Error::Version { .. })));
    }

    #[test]
    fn properties_are_stringified() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{
  "runtimeOptions": {
    "configProperties": {
      "System.GC.Server": true,
      "System.GC.HeapCount": 4,
      "Custom.Name": "value"
    }
  }
}"#,
        );

        let config = parse(&path).unwrap();
        assert_eq!(config.properties()["System.GC.Server"], "true");
        assert_eq!(config.properties()["System.GC.HeapCount"], "4");
        assert_eq!(config.properties()["Custom.Name"], "value");
    }

    #[test]
    fn probing_paths_accept_string_or_array() {
        let temp = TempDir::new().unwrap();
        let single = write(
            temp.path(),
            "A.runtimeconfig.json",
            r#"{"runtimeOptions": {"additionalProbingPaths": "/probe/one"}}"#,
        );
        let many = write(
            temp.path(),
            "B.runtimeconfig.json",
            r#"{"runtimeOptions": {"additionalProbingPaths": ["/probe/one", "/probe/two"]}}"#,
        );

        assert_eq!(parse(&single).unwrap().probe_paths(), [PathBuf::from("/probe/one")]);
        assert_eq!(
            parse(&many).unwrap().probe_paths(),
            [PathBuf::from("/probe/one"), PathBuf::from("/probe/two")]
        );
    }

    #[test]
    fn included_frameworks_mark_self_contained() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"includedFrameworks": [{"name": "Test.App", "version": "2.1.3"}]}}"#,
        );

        let config = parse(&path).unwrap();
        assert!(!config.is_framework_dependent());
        assert_eq!(config.included_frameworks()[0].version, FxVersion::new(2, 1, 3));
    }
}

mod roll_forward {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case(r#"{"rollForward": "Major", "rollForwardOnNoCandidateFx": 1}"#)]
    #[case(r#"{"rollForwardOnNoCandidateFx": 1, "rollForward": "Major"}"#)]
    #[case(r#"{"applyPatches": false, "rollForward": "Major"}"#)]
    fn both_spellings_at_top_level_fail_validation(#[case] options: &str) {
        let temp = TempDir::new().unwrap();
        let content = format!(r#"{{"runtimeOptions": {options}}}"#);
        let path = write(temp.path(), "App.runtimeconfig.json", &content);

        let err = parse(&path).unwrap_err();
        assert!(err.is_validation(), "expected validation error, got {err:?}");
    }

    #[test]
    fn both_spellings_in_framework_entry_fail_validation() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"framework": {
                "name": "Test.App", "version": "2.1.0",
                "rollForwardOnNoCandidateFx": 2, "rollForward": "LatestMinor"
            }}}"#,
        );

        assert!(parse(&path).unwrap_err().is_validation());
    }

    #[test]
    fn spellings_in_different_scopes_are_allowed() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {
                "rollForwardOnNoCandidateFx": 2,
                "framework": {"name": "Test.App", "version": "2.1.0", "rollForward": "LatestPatch"}
            }}"#,
        );

        let config = parse(&path).unwrap();
        assert_eq!(config.settings().effective_policy(), RollForwardPolicy::Major);
        assert_eq!(config.frameworks()[0].policy, RollForwardPolicy::LatestPatch);
    }

    #[test]
    fn unknown_policy_name_fails_validation() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"rollForward": "Sometimes"}}"#,
        );

        assert!(matches!(parse(&path), Err(Error::Validation { .. })));
    }

    #[test]
    fn framework_entry_overrides_top_level() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {
                "rollForward": "Major",
                "frameworks": [
                    {"name": "Test.App", "version": "2.1.0", "rollForward": "Disable"},
                    {"name": "Test.Web", "version": "2.1.0"}
                ]
            }}"#,
        );

        let config = parse(&path).unwrap();
        assert_eq!(config.frameworks()[0].policy, RollForwardPolicy::Disabled);
        assert_eq!(config.frameworks()[1].policy, RollForwardPolicy::Major);
    }

    #[test]
    fn environment_loses_to_top_level_but_wins_over_framework_entry() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {
                "rollForward": "LatestPatch",
                "framework": {"name": "Test.App", "version": "2.1.0", "rollForward": "Disable"}
            }}"#,
        );
        let env = HostEnvironment::empty().with_var(ROLL_FORWARD, "LatestMajor");

        let config = RuntimeConfig::parse(&HostFs, &path, None, None, None, &env).unwrap();
        assert_eq!(config.settings().effective_policy(), RollForwardPolicy::LatestPatch);
        assert_eq!(config.frameworks()[0].policy, RollForwardPolicy::LatestMajor);
    }

    #[test]
    fn environment_legacy_value_applies_to_frameworks() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"framework": {"name": "Test.App", "version": "2.1.0"}}}"#,
        );
        let env = HostEnvironment::empty().with_var(ROLL_FORWARD_ON_NO_CANDIDATE_FX, "0");

        let config = RuntimeConfig::parse(&HostFs, &path, None, None, None, &env).unwrap();
        assert_eq!(config.frameworks()[0].policy, RollForwardPolicy::Disabled);
    }

    #[test]
    fn inherited_settings_replace_builtin_defaults() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "Test.Web.runtimeconfig.json",
            r#"{"runtimeOptions": {"framework": {"name": "Test.App", "version": "2.1.0"}}}"#,
        );
        let inherited = RollForwardSettings {
            policy: Some(RollForwardPolicy::LatestMinor),
            apply_patches: Some(false),
            roll_to_prerelease: None,
        };

        let config = RuntimeConfig::parse(
            &HostFs,
            &path,
            None,
            Some(&inherited),
            None,
            &HostEnvironment::empty(),
        )
        .unwrap();
        assert_eq!(config.frameworks()[0].policy, RollForwardPolicy::LatestMinor);
        assert!(!config.frameworks()[0].apply_patches);
    }

    #[test]
    fn overrides_are_final() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {
                "framework": {"name": "Test.App", "version": "2.1.0", "rollForward": "Major"}
            }}"#,
        );
        let env = HostEnvironment::empty().with_var(ROLL_FORWARD, "LatestMajor");
        let overrides = OverrideSettings {
            roll_forward: Some(RollForwardPolicy::LatestPatch),
            ..Default::default()
        };

        let config =
            RuntimeConfig::parse(&HostFs, &path, None, None, Some(&overrides), &env).unwrap();
        assert_eq!(config.frameworks()[0].policy, RollForwardPolicy::LatestPatch);
        assert_eq!(config.settings().effective_policy(), RollForwardPolicy::LatestPatch);
    }

    #[test]
    fn pinned_version_is_exact() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"framework": {"name": "Test.App", "version": "2.1.0"}}}"#,
        );
        let overrides = OverrideSettings {
            fx_version: Some(FxVersion::new(2, 2, 0)),
            ..Default::default()
        };

        let config = RuntimeConfig::parse(
            &HostFs,
            &path,
            None,
            None,
            Some(&overrides),
            &HostEnvironment::empty(),
        )
        .unwrap();
        let fx = &config.frameworks()[0];
        assert_eq!(fx.requested_version, FxVersion::new(2, 2, 0));
        assert!(fx.use_exact_version);
        assert_eq!(fx.effective_policy(), RollForwardPolicy::Disabled);
    }

    #[test]
    fn applying_overrides_twice_changes_nothing() {
        let temp = TempDir::new().unwrap();
        let path = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"framework": {"name": "Test.App", "version": "2.1.0"}}}"#,
        );
        let overrides = OverrideSettings {
            roll_forward: Some(RollForwardPolicy::Major),
            apply_patches: Some(false),
            ..Default::default()
        };
        let env = HostEnvironment::empty();

        let once = RuntimeConfig::parse(&HostFs, &path, None, None, Some(&overrides), &env).unwrap();
        let twice = RuntimeConfig::parse(
            &HostFs,
            &path,
            None,
            Some(once.settings()),
            Some(&overrides),
            &env,
        )
        .unwrap();
        assert_eq!(once.frameworks(), twice.frameworks());
        assert_eq!(once.settings(), twice.settings());
    }
}

mod dev_config {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dev_values_seed_primary() {
        let temp = TempDir::new().unwrap();
        let primary = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {
                "additionalProbingPaths": ["/primary/probe"],
                "configProperties": {"Shared.Key": "primary", "Primary.Only": "p"}
            }}"#,
        );
        let dev = write(
            temp.path(),
            "App.runtimeconfig.dev.json",
            r#"{"runtimeOptions": {
                "additionalProbingPaths": ["/dev/probe", "/primary/probe"],
                "configProperties": {"Shared.Key": "dev", "Dev.Only": "d"}
            }}"#,
        );

        let config = RuntimeConfig::parse(
            &HostFs,
            &primary,
            Some(&dev),
            None,
            None,
            &HostEnvironment::empty(),
        )
        .unwrap();

        assert_eq!(config.properties()["Shared.Key"], "primary");
        assert_eq!(config.properties()["Primary.Only"], "p");
        assert_eq!(config.properties()["Dev.Only"], "d");
        assert_eq!(
            config.probe_paths(),
            [PathBuf::from("/primary/probe"), PathBuf::from("/dev/probe")]
        );
    }

    #[test]
    fn malformed_dev_file_invalidates_config() {
        let temp = TempDir::new().unwrap();
        let primary = write(temp.path(), "App.runtimeconfig.json", r#"{"runtimeOptions": {}}"#);
        let dev = write(temp.path(), "App.runtimeconfig.dev.json", "not json");

        let result = RuntimeConfig::parse(
            &HostFs,
            &primary,
            Some(&dev),
            None,
            None,
            &HostEnvironment::empty(),
        );
        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn override_probe_paths_come_first() {
        let temp = TempDir::new().unwrap();
        let primary = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"additionalProbingPaths": ["/from/config"]}}"#,
        );
        let overrides = OverrideSettings {
            additional_probing_paths: vec![PathBuf::from("/from/caller")],
            ..Default::default()
        };

        let config = RuntimeConfig::parse(
            &HostFs,
            &primary,
            None,
            None,
            Some(&overrides),
            &HostEnvironment::empty(),
        )
        .unwrap();
        assert_eq!(
            config.probe_paths(),
            [PathBuf::from("/from/caller"), PathBuf::from("/from/config")]
        );
    }
}

mod properties {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn first_writer_wins_across_layers() {
        let temp = TempDir::new().unwrap();
        let app = write(
            temp.path(),
            "App.runtimeconfig.json",
            r#"{"runtimeOptions": {"configProperties": {"Key": "app"}}}"#,
        );
        let fx = write(
            temp.path(),
            "Test.App.runtimeconfig.json",
            r#"{"runtimeOptions": {"configProperties": {"Key": "fx", "Fx.Only": "yes"}}}"#,
        );

        let app = parse(&app).unwrap();
        let fx = parse(&fx).unwrap();
        let merged = merge_properties([&app, &fx]);

        assert_eq!(merged["Key"], "app");
        assert_eq!(merged["Fx.Only"], "yes");
    }
}
