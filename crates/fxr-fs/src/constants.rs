//! Well-known host file names.

use std::path::{Path, PathBuf};

/// Files the host expects next to an application or inside a framework
/// directory, named after the owning component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostFile {
    /// `<name>.deps.json`, the dependency manifest
    DepsJson,
    /// `<name>.runtimeconfig.json`, the runtime configuration
    RuntimeConfig,
    /// `<name>.runtimeconfig.dev.json`, the developer-only configuration
    RuntimeConfigDev,
}

impl HostFile {
    /// Get the file name suffix appended to the component name.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::DepsJson => ".deps.json",
            Self::RuntimeConfig => ".runtimeconfig.json",
            Self::RuntimeConfigDev => ".runtimeconfig.dev.json",
        }
    }

    /// Path of this file for an application binary, e.g. `app/Foo.dll`
    /// becomes `app/Foo.deps.json`.
    pub fn for_app(&self, app_path: &Path) -> PathBuf {
        let stem = app_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        app_path.with_file_name(format!("{stem}{}", self.suffix()))
    }

    /// Path of this file inside a framework directory, e.g.
    /// `shared/Test.App/2.1.3/Test.App.deps.json`.
    pub fn for_framework(&self, framework_dir: &Path, framework_name: &str) -> PathBuf {
        framework_dir.join(format!("{framework_name}{}", self.suffix()))
    }
}

impl std::fmt::Display for HostFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "*{}", self.suffix())
    }
}
