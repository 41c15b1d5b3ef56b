//! End-to-end resolution scenarios
//!
//! Each test lays out a runtime install and an application on disk and
//! runs the full pipeline through `fxr_core::resolve`.

use fxr_core::{ErrorKind, HostContext, ResolveRequest, resolve};
use fxr_fs::HostFs;
use fxr_test_utils::TestInstall;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

// =============================================================================
// Test Infrastructure
// =============================================================================

fn context(install: &TestInstall) -> HostContext<HostFs> {
    HostContext::new(HostFs, install.dotnet_root())
        .with_user_store(None)
        .with_rid("linux-x64")
        .unwrap()
}

fn request(install: &TestInstall) -> ResolveRequest {
    ResolveRequest::new(install.app_path("App"))
}

/// App referencing `Test.App` 2.1.0 with `policy`, installed versions
/// 2.1.3, 2.2.0 and 3.0.0.
fn test_app_install(policy: &str) -> TestInstall {
    let install = TestInstall::new();
    install.add_frameworks("Test.App", &["2.1.3", "2.2.0", "3.0.0"]);
    install.write_app_config(
        "App",
        json!({ "runtimeOptions": {
            "rollForward": policy,
            "framework": { "name": "Test.App", "version": "2.1.0" }
        }}),
    );
    install
}

fn app_deps(libraries: &[(&str, Value)]) -> Value {
    let mut targets = serde_json::Map::new();
    let mut libs = serde_json::Map::new();
    for (key, target) in libraries {
        targets.insert(key.to_string(), target.clone());
        libs.insert(
            key.to_string(),
            json!({ "type": "package", "serviceable": false }),
        );
    }
    json!({
        "runtimeTarget": { "name": ".NETCoreApp,Version=v2.1" },
        "targets": { ".NETCoreApp,Version=v2.1": targets },
        "libraries": libs
    })
}

// =============================================================================
// Framework roll-forward
// =============================================================================

#[test]
fn minor_policy_stays_on_requested_minor() {
    let install = test_app_install("Minor");
    let paths = resolve(&context(&install), &request(&install)).unwrap();

    assert_eq!(paths.frameworks.len(), 1);
    assert_eq!(paths.frameworks[0].resolved_version.to_string(), "2.1.3");
    assert_eq!(paths.frameworks[0].dir, install.framework_dir("Test.App", "2.1.3"));
}

#[test]
fn major_policy_takes_the_next_major() {
    let install = test_app_install("Major");
    let paths = resolve(&context(&install), &request(&install)).unwrap();

    assert_eq!(paths.frameworks[0].resolved_version.to_string(), "3.0.0");
    assert!(paths.frameworks[0].rolled_forward_across_minor_or_major);
}

#[test]
fn disabled_policy_without_exact_version_fails() {
    let install = test_app_install("Disable");
    let err = resolve(&context(&install), &request(&install)).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::FrameworkNotFound);
    assert!(err.to_string().contains("Test.App"));
    assert!(err.to_string().contains("2.1.0"));
}

#[test]
fn legacy_policy_spelling_behaves_like_modern() {
    let install = TestInstall::new();
    install.add_frameworks("Test.App", &["2.1.3", "2.2.0", "3.0.0"]);
    install.write_app_config(
        "App",
        json!({ "runtimeOptions": {
            "framework": {
                "name": "Test.App",
                "version": "2.1.0",
                "rollForwardOnNoCandidateFx": 2
            }
        }}),
    );
    let paths = resolve(&context(&install), &request(&install)).unwrap();
    assert_eq!(paths.frameworks[0].resolved_version.to_string(), "3.0.0");
}

// =============================================================================
// Assets
// =============================================================================

#[test]
fn placeholder_only_library_adds_nothing_to_tpa() {
    let install = test_app_install("Minor");
    install.write_app_deps(
        "App",
        app_deps(&[
            ("App/1.0.0", json!({ "runtime": { "App.dll": {} } })),
            ("Foo/1.0.0", json!({ "runtime": { "lib/netstandard1.0/_._": {} } })),
        ]),
    );
    let app_dll = install.touch("app/App.dll");

    let paths = resolve(&context(&install), &request(&install)).unwrap();
    assert_eq!(paths.tpa, vec![app_dll]);
}

#[test]
fn tpa_never_holds_two_assets_with_one_name() {
    let install = test_app_install("Minor");
    let fx_dir = install.framework_dir("Test.App", "2.1.3");
    install.write_framework_deps(
        "Test.App",
        "2.1.3",
        json!({
            "targets": { "t": {
                "System.Text.Json/4.0.0": { "runtime": { "System.Text.Json.dll": {} } }
            }},
            "libraries": { "System.Text.Json/4.0.0": { "type": "package", "serviceable": false } }
        }),
    );
    install.touch_in(&fx_dir, "System.Text.Json.dll");

    // The app carries a newer copy under a different package version.
    install.write_app_deps(
        "App",
        app_deps(&[(
            "System.Text.Json/6.0.0",
            json!({ "runtime": { "lib/netstandard2.0/System.Text.Json.dll": {} } }),
        )]),
    );
    let app_copy = install.touch("app/System.Text.Json.dll");

    let paths = resolve(&context(&install), &request(&install)).unwrap();
    assert_eq!(paths.tpa, vec![app_copy]);
}

#[test]
fn linux_rid_assets_win_over_any() {
    let install = test_app_install("Minor");
    install.write_framework_deps(
        "Test.App",
        "2.1.3",
        json!({ "runtimes": { "linux-x64": ["linux-x64", "linux", "unix", "any"] } }),
    );
    install.write_app_deps(
        "App",
        app_deps(&[(
            "Foo/1.0.0",
            json!({ "runtimeTargets": {
                "runtimes/linux/lib/netstandard2.0/Foo.dll": { "rid": "linux", "assetType": "runtime" },
                "runtimes/any/lib/netstandard2.0/Foo.dll": { "rid": "any", "assetType": "runtime" }
            }}),
        )]),
    );
    let linux = install.touch("app/runtimes/linux/lib/netstandard2.0/Foo.dll");
    install.touch("app/runtimes/any/lib/netstandard2.0/Foo.dll");

    let paths = resolve(&context(&install), &request(&install)).unwrap();
    assert_eq!(paths.tpa, vec![linux]);
}

#[test]
fn missing_asset_aborts_with_identifiers() {
    let install = test_app_install("Minor");
    install.write_app_deps(
        "App",
        app_deps(&[("Foo/1.0.0", json!({ "runtime": { "lib/netstandard2.0/Foo.dll": {} } }))]),
    );

    let err = resolve(&context(&install), &request(&install)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AssetNotFound);
    assert!(err.to_string().contains("Foo/1.0.0"));
    assert!(err.to_string().contains("lib/netstandard2.0/Foo.dll"));
}

#[test]
fn app_without_manifest_falls_back_to_directory_scan() {
    let install = test_app_install("Minor");
    let app_dll = install.touch("app/App.dll");
    let helper = install.touch("app/Helper.ni.dll");
    install.touch("app/Helper.dll");

    let paths = resolve(&context(&install), &request(&install)).unwrap();
    assert_eq!(paths.tpa, vec![app_dll, helper]);
}

#[test]
fn servicing_directories_come_first() {
    let install = test_app_install("Minor");
    let servicing = install.root().join("servicing");
    let mut doc = app_deps(&[
        ("Plain/1.0.0", json!({ "native": { "libplain.so": {} } })),
        ("Patched/1.0.0", json!({ "native": { "lib/libpatched.so": {} } })),
    ]);
    doc["libraries"]["Patched/1.0.0"]["serviceable"] = json!(true);
    install.write_app_deps("App", doc);

    install.touch("app/libplain.so");
    let patched = install.touch("servicing/pkgs/patched/1.0.0/lib/libpatched.so");
    let ctx = context(&install).with_servicing_root(&servicing);

    let paths = resolve(&ctx, &request(&install)).unwrap();
    let real = |p: &std::path::Path| fxr_fs::FileSystem::realpath(&HostFs, p);
    assert_eq!(paths.native_search_dirs[0], real(patched.parent().unwrap()));
    assert_eq!(paths.native_search_dirs[1], real(&install.app_dir()));
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn conflicting_policy_spellings_fail_validation() {
    let install = TestInstall::new();
    install.add_framework("Test.App", "2.1.3");
    install.write_app_config(
        "App",
        json!({ "runtimeOptions": {
            "rollForward": "Major",
            "rollForwardOnNoCandidateFx": 0,
            "framework": { "name": "Test.App", "version": "2.1.0" }
        }}),
    );

    let err = resolve(&context(&install), &request(&install)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigValidation);
}

#[test]
fn self_contained_app_resolves_without_frameworks() {
    let install = TestInstall::new();
    install.write_app_config(
        "App",
        json!({ "runtimeOptions": {
            "includedFrameworks": [{ "name": "Test.App", "version": "2.1.3" }]
        }}),
    );
    let app_dll = install.touch("app/App.dll");

    let paths = resolve(&context(&install), &request(&install)).unwrap();
    assert!(paths.self_contained);
    assert!(paths.frameworks.is_empty());
    assert_eq!(paths.tpa, vec![app_dll]);
}
