//! [`TestInstall`] builder for on-disk resolver scenarios.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// A temporary directory holding an install root (`dotnet/`), an
/// application directory (`app/`) and anything else a test writes.
///
/// # Example
///
/// ```rust,no_run
/// use fxr_test_utils::TestInstall;
///
/// let install = TestInstall::new();
/// install.add_framework("Test.App", "2.1.3");
/// install.write_app_config("App", serde_json::json!({
///     "runtimeOptions": { "framework": { "name": "Test.App", "version": "2.1.0" } }
/// }));
/// assert!(install.app_path("App").ends_with("app/App.dll"));
/// ```
pub struct TestInstall {
    temp_dir: TempDir,
}

impl Default for TestInstall {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInstall {
    /// Create the directory with empty `dotnet/` and `app/` folders.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("dotnet")).unwrap();
        fs::create_dir_all(temp_dir.path().join("app")).unwrap();
        Self { temp_dir }
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn dotnet_root(&self) -> PathBuf {
        self.root().join("dotnet")
    }

    pub fn app_dir(&self) -> PathBuf {
        self.root().join("app")
    }

    /// `app/<name>.dll`
    pub fn app_path(&self, name: &str) -> PathBuf {
        self.app_dir().join(format!("{name}.dll"))
    }

    /// `dotnet/shared/<name>/<version>`
    pub fn framework_dir(&self, name: &str, version: &str) -> PathBuf {
        self.dotnet_root().join("shared").join(name).join(version)
    }

    /// Create an installed framework version directory.
    pub fn add_framework(&self, name: &str, version: &str) -> PathBuf {
        let dir = self.framework_dir(name, version);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    /// Install `name` at every version in `versions`.
    pub fn add_frameworks(&self, name: &str, versions: &[&str]) {
        for version in versions {
            self.add_framework(name, version);
        }
    }

    /// Write `<name>.deps.json` into an installed framework.
    pub fn write_framework_deps(&self, name: &str, version: &str, doc: Value) -> PathBuf {
        let path = self.add_framework(name, version).join(format!("{name}.deps.json"));
        write_json(&path, &doc);
        path
    }

    /// Write `<name>.runtimeconfig.json` into an installed framework.
    pub fn write_framework_config(&self, name: &str, version: &str, doc: Value) -> PathBuf {
        let path = self
            .add_framework(name, version)
            .join(format!("{name}.runtimeconfig.json"));
        write_json(&path, &doc);
        path
    }

    /// Make framework `name`/`version` reference `lower` at `lower_version`.
    pub fn chain_framework(&self, name: &str, version: &str, lower: &str, lower_version: &str) {
        self.write_framework_config(
            name,
            version,
            json!({
                "runtimeOptions": {
                    "framework": { "name": lower, "version": lower_version }
                }
            }),
        );
    }

    /// Write `app/<app>.runtimeconfig.json`.
    pub fn write_app_config(&self, app: &str, doc: Value) -> PathBuf {
        let path = self.app_dir().join(format!("{app}.runtimeconfig.json"));
        write_json(&path, &doc);
        path
    }

    /// Write `app/<app>.runtimeconfig.dev.json`.
    pub fn write_app_dev_config(&self, app: &str, doc: Value) -> PathBuf {
        let path = self.app_dir().join(format!("{app}.runtimeconfig.dev.json"));
        write_json(&path, &doc);
        path
    }

    /// Write `app/<app>.deps.json`.
    pub fn write_app_deps(&self, app: &str, doc: Value) -> PathBuf {
        let path = self.app_dir().join(format!("{app}.deps.json"));
        write_json(&path, &doc);
        path
    }

    /// Write JSON at `relative` (to the root), creating parent directories.
    pub fn write_json(&self, relative: &str, doc: Value) -> PathBuf {
        let path = self.root().join(relative);
        write_json(&path, &doc);
        path
    }

    /// Create an empty file at `relative` (to the root), creating parent
    /// directories.
    pub fn touch(&self, relative: &str) -> PathBuf {
        let path = self.root().join(relative);
        touch(&path);
        path
    }

    /// Create an empty file at `relative` inside `dir`.
    pub fn touch_in(&self, dir: &Path, relative: &str) -> PathBuf {
        let path = dir.join(relative);
        touch(&path);
        path
    }
}

fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, b"").unwrap();
}

fn write_json(path: &Path, doc: &Value) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
}
