//! Framework selection and framework-chain resolution.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};

use fxr_config::RuntimeConfig;
use fxr_deps::DependencyManifest;
use fxr_fs::{FileSystem, HostFile};
use fxr_version::{FrameworkReference, FxVersion, RollForwardSettings};
use serde::Serialize;

use crate::context::HostContext;
use crate::error::{Error, Result};

/// Upper bound on chain restarts caused by re-references that tighten an
/// already resolved framework.
const MAX_RESTARTS: usize = 16;

/// True iff `resolved` differs from `requested` in major or minor.
/// Patch-only differences never count.
pub fn did_roll_forward_across_minor_or_major(requested: &FxVersion, resolved: &FxVersion) -> bool {
    requested.major() != resolved.major() || requested.minor() != resolved.minor()
}

/// One installed version directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledFramework {
    pub version: FxVersion,
    pub dir: PathBuf,
}

/// Outcome of resolving one framework reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedFramework {
    pub name: String,
    pub requested_version: FxVersion,
    pub resolved_version: FxVersion,
    pub dir: PathBuf,
    pub rolled_forward_across_minor_or_major: bool,
}

/// A resolved framework layer together with its own configuration and
/// manifest.
#[derive(Debug, Clone)]
pub struct FrameworkDefinition {
    pub reference: FrameworkReference,
    pub resolved: ResolvedFramework,
    pub runtime_config: RuntimeConfig,
    pub manifest: DependencyManifest,
}

impl FrameworkDefinition {
    pub fn name(&self) -> &str {
        &self.resolved.name
    }

    pub fn dir(&self) -> &Path {
        &self.resolved.dir
    }
}

/// Finds installed framework versions beneath the context's install roots.
pub struct FrameworkResolver<'a, F> {
    ctx: &'a HostContext<F>,
}

impl<'a, F: FileSystem> FrameworkResolver<'a, F> {
    pub fn new(ctx: &'a HostContext<F>) -> Self {
        Self { ctx }
    }

    /// Installed versions of `name`, across all install roots in search
    /// order, each root sorted ascending. Directories whose name is not a
    /// version are ignored.
    pub fn installed_versions(&self, name: &str) -> Vec<InstalledFramework> {
        let fs = self.ctx.fs();
        let mut installed = Vec::new();
        for root in self.ctx.framework_roots(name) {
            let mut in_root: Vec<InstalledFramework> = fs
                .list_directories(&root)
                .into_iter()
                .filter_map(|dir_name| match FxVersion::parse(&dir_name, false) {
                    Ok(version) => Some(InstalledFramework {
                        version,
                        dir: root.join(&dir_name),
                    }),
                    Err(e) => {
                        tracing::debug!(root = %root.display(), %dir_name, error = %e, "Skipping non-version directory");
                        None
                    }
                })
                .collect();
            in_root.sort_by(|a, b| a.version.cmp(&b.version));
            installed.extend(in_root);
        }
        installed
    }

    /// Pick the best installed version for `reference`.
    ///
    /// The best candidate over all roots wins; when several roots hold it
    /// the earliest root is used.
    pub fn resolve(&self, reference: &FrameworkReference) -> Result<ResolvedFramework> {
        let installed = self.installed_versions(&reference.name);
        tracing::debug!(
            %reference,
            candidates = installed.len(),
            "Resolving framework"
        );

        let Some(version) = reference.select(installed.iter().map(|i| &i.version)) else {
            let mut versions: Vec<&FxVersion> = installed.iter().map(|i| &i.version).collect();
            versions.sort();
            versions.dedup();
            let versions = versions.into_iter().map(ToString::to_string).collect();
            return Err(not_found(reference, versions));
        };

        // Present by construction: `select` only returns installed versions.
        let dir = installed
            .iter()
            .find(|i| &i.version == version)
            .map(|i| i.dir.clone())
            .unwrap_or_default();

        let resolved = ResolvedFramework {
            name: reference.name.clone(),
            requested_version: reference.requested_version.clone(),
            resolved_version: version.clone(),
            rolled_forward_across_minor_or_major: did_roll_forward_across_minor_or_major(
                &reference.requested_version,
                version,
            ),
            dir,
        };
        tracing::info!(
            framework = %resolved.name,
            requested = %resolved.requested_version,
            resolved = %resolved.resolved_version,
            dir = %resolved.dir.display(),
            "Resolved framework"
        );
        Ok(resolved)
    }

    /// Resolve every framework reachable from `app_config`, most dependent
    /// first and the root framework last.
    ///
    /// Each layer's `<name>.runtimeconfig.json` may reference lower
    /// frameworks; it is parsed with the referencing layer's settings as
    /// its defaults. A framework referenced more than once is resolved
    /// against the merge of its references; when a later reference tightens
    /// one that was already resolved, the chain is resolved again.
    pub fn resolve_chain(&self, app_config: &RuntimeConfig) -> Result<Vec<FrameworkDefinition>> {
        let mut merged: HashMap<String, FrameworkReference> = HashMap::new();
        let mut restarts = 0;
        loop {
            match self.resolve_chain_once(app_config, &mut merged)? {
                ChainPass::Complete(chain) => return Ok(order_by_dependency(chain)),
                // Merging is monotonic, so only pathological chains get here.
                ChainPass::Restart(reference) if restarts >= MAX_RESTARTS => {
                    return Err(not_found(&reference, Vec::new()));
                }
                ChainPass::Restart(reference) => {
                    restarts += 1;
                    tracing::debug!(%reference, restarts, "Framework reference tightened - restarting chain resolution");
                }
            }
        }
    }

    /// One breadth-first pass over the chain.
    fn resolve_chain_once(
        &self,
        app_config: &RuntimeConfig,
        merged: &mut HashMap<String, FrameworkReference>,
    ) -> Result<ChainPass> {
        let mut chain = Vec::new();
        let mut resolved_names = HashSet::new();
        let mut pending: VecDeque<(FrameworkReference, RollForwardSettings)> = app_config
            .frameworks()
            .iter()
            .map(|r| (r.clone(), *app_config.settings()))
            .collect();

        while let Some((reference, parent_settings)) = pending.pop_front() {
            let effective = match merged.get_mut(&reference.name) {
                Some(existing) => {
                    let changed = existing.merge_with(&reference);
                    if resolved_names.contains(&reference.name) {
                        if changed {
                            return Ok(ChainPass::Restart(existing.clone()));
                        }
                        continue;
                    }
                    existing.clone()
                }
                None => {
                    merged.insert(reference.name.clone(), reference.clone());
                    reference
                }
            };

            let resolved = self.resolve(&effective)?;
            let config_path = HostFile::RuntimeConfig.for_framework(&resolved.dir, &resolved.name);
            let runtime_config = RuntimeConfig::parse(
                self.ctx.fs(),
                &config_path,
                None,
                Some(&parent_settings),
                None,
                self.ctx.env(),
            )?;
            let manifest = load_framework_manifest(self.ctx.fs(), &resolved)?;

            pending.extend(
                runtime_config
                    .frameworks()
                    .iter()
                    .map(|r| (r.clone(), *runtime_config.settings())),
            );
            resolved_names.insert(resolved.name.clone());
            chain.push(FrameworkDefinition {
                reference: effective,
                resolved,
                runtime_config,
                manifest,
            });
        }
        Ok(ChainPass::Complete(chain))
    }
}

/// Reorder `chain` so every framework precedes the frameworks it
/// references. Unrelated layers keep their discovery order.
fn order_by_dependency(chain: Vec<FrameworkDefinition>) -> Vec<FrameworkDefinition> {
    let mut remaining = chain;
    let mut ordered = Vec::with_capacity(remaining.len());
    while !remaining.is_empty() {
        let referenced_by_remaining = |name: &str| {
            remaining.iter().any(|fx| {
                fx.name() != name
                    && fx.runtime_config.frameworks().iter().any(|r| r.name == name)
            })
        };
        let next = match remaining.iter().position(|fx| !referenced_by_remaining(fx.name())) {
            Some(index) => index,
            None => {
                tracing::warn!(
                    frameworks = remaining.len(),
                    "Framework references form a cycle - keeping discovery order"
                );
                0
            }
        };
        ordered.push(remaining.remove(next));
    }
    ordered
}

enum ChainPass {
    Complete(Vec<FrameworkDefinition>),
    Restart(FrameworkReference),
}

fn not_found(reference: &FrameworkReference, installed: Vec<String>) -> Error {
    Error::FrameworkNotFound {
        name: reference.name.clone(),
        version: reference.requested_version.to_string(),
        policy: reference.effective_policy().to_string(),
        installed,
    }
}

fn load_framework_manifest(
    fs: &impl FileSystem,
    resolved: &ResolvedFramework,
) -> Result<DependencyManifest> {
    let path = HostFile::DepsJson.for_framework(&resolved.dir, &resolved.name);
    let manifest = DependencyManifest::load(fs, &path)?;
    if !manifest.exists() {
        tracing::warn!(
            framework = %resolved.name,
            path = %path.display(),
            "Framework has no dependency manifest - treating it as empty"
        );
    }
    Ok(manifest)
}
