//! The single entry point the host calls before starting the runtime.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fxr_config::{OverrideSettings, RuntimeConfig, merge_properties};
use fxr_deps::DependencyManifest;
use fxr_fs::{FileSystem, HostFile};
use serde::Serialize;

use crate::context::HostContext;
use crate::error::Result;
use crate::framework::{FrameworkResolver, ResolvedFramework};
use crate::probe::{ManifestOrigin, ManifestSource, ProbeLocation, ProbePipeline};

/// What to resolve: an application binary and the files describing it.
///
/// Configuration and manifest paths default to the files named after the
/// application next to it.
#[derive(Debug, Clone, Default)]
pub struct ResolveRequest {
    pub app_path: PathBuf,
    pub deps_path: Option<PathBuf>,
    pub runtime_config_path: Option<PathBuf>,
    pub dev_runtime_config_path: Option<PathBuf>,
    pub overrides: Option<OverrideSettings>,
    /// Extra manifests, or directories of them, processed after the app's.
    pub additional_deps: Vec<PathBuf>,
}

impl ResolveRequest {
    pub fn new(app_path: impl Into<PathBuf>) -> Self {
        Self {
            app_path: app_path.into(),
            ..Self::default()
        }
    }

    pub fn with_overrides(mut self, overrides: OverrideSettings) -> Self {
        self.overrides = Some(overrides);
        self
    }

    pub fn with_additional_deps(mut self, path: impl Into<PathBuf>) -> Self {
        self.additional_deps.push(path.into());
        self
    }

    pub fn app_dir(&self) -> PathBuf {
        self.app_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn deps_path(&self) -> PathBuf {
        self.deps_path
            .clone()
            .unwrap_or_else(|| HostFile::DepsJson.for_app(&self.app_path))
    }

    pub fn runtime_config_path(&self) -> PathBuf {
        self.runtime_config_path
            .clone()
            .unwrap_or_else(|| HostFile::RuntimeConfig.for_app(&self.app_path))
    }

    pub fn dev_runtime_config_path(&self) -> PathBuf {
        self.dev_runtime_config_path
            .clone()
            .unwrap_or_else(|| HostFile::RuntimeConfigDev.for_app(&self.app_path))
    }
}

/// Everything the runtime needs to start, plus the chosen frameworks for
/// diagnostics.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPaths {
    pub rid: String,
    pub self_contained: bool,
    pub frameworks: Vec<ResolvedFramework>,
    pub tpa: Vec<PathBuf>,
    pub native_search_dirs: Vec<PathBuf>,
    pub resource_search_dirs: Vec<PathBuf>,
    pub properties: BTreeMap<String, String>,
    pub probe_locations: Vec<ProbeLocation>,
}

/// Resolve frameworks and assets for `request`.
///
/// Stages run strictly in order: configuration, framework chain,
/// manifests, probing. The first failure aborts the resolution.
pub fn resolve<F: FileSystem>(ctx: &HostContext<F>, request: &ResolveRequest) -> Result<ResolvedPaths> {
    let fs = ctx.fs();
    let app_dir = request.app_dir();

    let config = RuntimeConfig::parse(
        fs,
        &request.runtime_config_path(),
        Some(&request.dev_runtime_config_path()),
        None,
        request.overrides.as_ref(),
        ctx.env(),
    )?;
    let self_contained = !config.is_framework_dependent();
    let frameworks = if self_contained {
        tracing::debug!(app = %request.app_path.display(), "No framework references - app is self-contained");
        Vec::new()
    } else {
        FrameworkResolver::new(ctx).resolve_chain(&config)?
    };

    let app_manifest = DependencyManifest::load(fs, &request.deps_path())?;

    // The root framework's graph serves every layer; self-contained apps
    // carry their own.
    let graph = frameworks
        .last()
        .and_then(|fx| fx.manifest.rid_fallback_graph())
        .or_else(|| app_manifest.rid_fallback_graph())
        .cloned()
        .unwrap_or_default();
    let graph = Arc::new(graph);

    let mut additional = Vec::new();
    let env_deps = ctx.env().additional_deps();
    for path in request.additional_deps.iter().chain(&env_deps) {
        for file in expand_additional_deps(fs, path) {
            let manifest = DependencyManifest::load(fs, &file)?;
            if !manifest.exists() {
                tracing::warn!(path = %file.display(), "Additional dependency manifest not found - skipping");
                continue;
            }
            let dir = file.parent().map(Path::to_path_buf).unwrap_or_default();
            additional.push((dir, manifest));
        }
    }

    let mut pipeline = ProbePipeline::new(fs, ctx.rid(), Arc::clone(&graph));
    if let Some(root) = ctx.servicing_root() {
        pipeline = pipeline.with_servicing(&root, ctx.arch());
    }
    for fx in &frameworks {
        pipeline = pipeline.with_framework(fx.dir(), &fx.manifest);
    }
    pipeline = pipeline.with_app(&app_dir);
    match config.tfm() {
        Some(tfm) => {
            for store in ctx.store_roots() {
                pipeline = pipeline.with_store(&store, ctx.arch(), tfm);
            }
        }
        None => tracing::debug!("No target framework moniker - store probing disabled"),
    }
    let mut probe_dirs: Vec<&PathBuf> = Vec::new();
    let fx_probe_dirs = frameworks.iter().flat_map(|fx| fx.runtime_config.probe_paths());
    for dir in config.probe_paths().iter().chain(fx_probe_dirs) {
        if !probe_dirs.contains(&dir) {
            probe_dirs.push(dir);
        }
    }
    for dir in probe_dirs {
        pipeline = pipeline.with_additional(dir);
    }

    let mut sources = vec![ManifestSource {
        manifest: &app_manifest,
        dir: app_dir.clone(),
        origin: ManifestOrigin::App,
    }];
    sources.extend(additional.iter().map(|(dir, manifest)| ManifestSource {
        manifest,
        dir: dir.clone(),
        origin: ManifestOrigin::AdditionalDeps,
    }));
    sources.extend(frameworks.iter().map(|fx| ManifestSource {
        manifest: &fx.manifest,
        dir: fx.dir().to_path_buf(),
        origin: ManifestOrigin::Framework,
    }));

    let assets = pipeline.resolve(&sources)?;
    let probe_locations = pipeline.locations().to_vec();
    let properties = merge_properties(
        std::iter::once(&config).chain(frameworks.iter().map(|fx| &fx.runtime_config)),
    );

    tracing::info!(
        app = %request.app_path.display(),
        frameworks = frameworks.len(),
        tpa = assets.tpa.len(),
        native_dirs = assets.native_search_dirs.len(),
        "Resolution complete"
    );

    Ok(ResolvedPaths {
        rid: ctx.rid().to_string(),
        self_contained,
        frameworks: frameworks.into_iter().map(|fx| fx.resolved).collect(),
        tpa: assets.tpa,
        native_search_dirs: assets.native_search_dirs,
        resource_search_dirs: assets.resource_search_dirs,
        properties,
        probe_locations,
    })
}

/// A manifest path, or every `*.deps.json` directly inside a directory.
fn expand_additional_deps(fs: &impl FileSystem, path: &Path) -> Vec<PathBuf> {
    if !fs.directory_exists(path) {
        return vec![path.to_path_buf()];
    }
    fs.list_entries(path)
        .into_iter()
        .filter(|name| name.ends_with(HostFile::DepsJson.suffix()))
        .map(|name| path.join(name))
        .filter(|p| fs.file_exists(p))
        .collect()
}
