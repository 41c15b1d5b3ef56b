//! Probe locations and the pipeline that turns manifest entries into
//! concrete paths.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use fxr_deps::{AssetType, DependencyManifest, ManifestEntry, RidFallbackGraph};
use fxr_fs::{FileSystem, NormalizedPath};
use serde::Serialize;

use crate::error::{Error, Result};

/// Servicing subdirectory holding serviceable packages.
const SERVICING_PACKAGES_DIR: &str = "pkgs";

/// App-directory scan order when the app has no manifest.
const SCAN_EXTENSIONS: [&str; 4] = [".ni.dll", ".dll", ".ni.exe", ".exe"];

/// What a probe location is and which entries it may answer for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProbeKind {
    /// `<servicing>/<arch>`: native images of serviceable runtime assets.
    ServicingNativeImage,
    /// `<servicing>/pkgs`: serviceable assets in package layout.
    Servicing,
    /// A framework directory, by position in the framework chain.
    Framework(usize),
    /// The directory of the manifest an app-local entry came from.
    App,
    /// `<store>/<arch>/<tfm>`, package layout.
    Store,
    /// Caller or configuration supplied directory, package layout.
    Additional,
}

impl ProbeKind {
    fn rank(&self) -> u8 {
        match self {
            Self::ServicingNativeImage => 0,
            Self::Servicing => 1,
            Self::Framework(_) => 2,
            Self::App => 3,
            Self::Store => 4,
            Self::Additional => 5,
        }
    }
}

/// One directory consulted, in order, when locating an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeLocation {
    pub dir: PathBuf,
    pub kind: ProbeKind,
}

/// Where a manifest handed to the pipeline came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestOrigin {
    App,
    AdditionalDeps,
    Framework,
}

/// A manifest plus the directory it was read from.
#[derive(Debug, Clone)]
pub struct ManifestSource<'a> {
    pub manifest: &'a DependencyManifest,
    pub dir: PathBuf,
    pub origin: ManifestOrigin,
}

/// The three path lists handed to the runtime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAssets {
    /// Trusted platform assemblies, unique by asset name.
    pub tpa: Vec<PathBuf>,
    pub native_search_dirs: Vec<PathBuf>,
    pub resource_search_dirs: Vec<PathBuf>,
}

/// Ordered probe locations over one framework chain.
///
/// Locations stay ordered by kind whatever order they are added in:
/// servicing, frameworks, app, stores, then additional directories.
pub struct ProbePipeline<'a, F> {
    fs: &'a F,
    rid: String,
    graph: Arc<RidFallbackGraph>,
    locations: Vec<ProbeLocation>,
    frameworks: Vec<&'a DependencyManifest>,
    servicing_root: Option<PathBuf>,
}

impl<'a, F: FileSystem> ProbePipeline<'a, F> {
    pub fn new(fs: &'a F, rid: impl Into<String>, graph: Arc<RidFallbackGraph>) -> Self {
        Self {
            fs,
            rid: rid.into(),
            graph,
            locations: Vec::new(),
            frameworks: Vec::new(),
            servicing_root: None,
        }
    }

    fn push(&mut self, dir: PathBuf, kind: ProbeKind) {
        let at = self
            .locations
            .iter()
            .position(|l| l.kind.rank() > kind.rank())
            .unwrap_or(self.locations.len());
        self.locations.insert(at, ProbeLocation { dir, kind });
    }

    /// Servicing probes beneath `root`, native images first.
    pub fn with_servicing(mut self, root: &Path, arch: &str) -> Self {
        self.push(root.join(arch), ProbeKind::ServicingNativeImage);
        self.push(root.join(SERVICING_PACKAGES_DIR), ProbeKind::Servicing);
        self.servicing_root = Some(self.fs.realpath(root));
        self
    }

    /// The next framework layer, outermost first.
    pub fn with_framework(mut self, dir: impl Into<PathBuf>, manifest: &'a DependencyManifest) -> Self {
        let index = self.frameworks.len();
        self.frameworks.push(manifest);
        self.push(dir.into(), ProbeKind::Framework(index));
        self
    }

    pub fn with_app(mut self, dir: impl Into<PathBuf>) -> Self {
        self.push(dir.into(), ProbeKind::App);
        self
    }

    /// A store root; probed as `<root>/<arch>/<tfm>`.
    pub fn with_store(mut self, root: &Path, arch: &str, tfm: &str) -> Self {
        self.push(root.join(arch).join(tfm), ProbeKind::Store);
        self
    }

    pub fn with_additional(mut self, dir: impl Into<PathBuf>) -> Self {
        self.push(dir.into(), ProbeKind::Additional);
        self
    }

    pub fn locations(&self) -> &[ProbeLocation] {
        &self.locations
    }

    /// First location holding `entry`, or `None`.
    pub fn probe(&self, entry: &ManifestEntry, source: &ManifestSource<'_>) -> Option<PathBuf> {
        for location in &self.locations {
            let candidate = match location.kind {
                ProbeKind::ServicingNativeImage => (entry.is_serviceable
                    && entry.asset_type == AssetType::Runtime)
                    .then(|| package_path(&location.dir, entry)),
                ProbeKind::Servicing => entry
                    .is_serviceable
                    .then(|| package_path(&location.dir, entry)),
                ProbeKind::Framework(index) => self
                    .frameworks
                    .get(index)
                    .filter(|m| m.contains_asset(&entry.library_key(), entry.asset_type))
                    .map(|_| local_path(&location.dir, entry, false)),
                ProbeKind::App => (source.origin != ManifestOrigin::Framework)
                    .then(|| local_path(&location.dir, entry, true)),
                ProbeKind::Store | ProbeKind::Additional => Some(package_path(&location.dir, entry)),
            };
            let Some(candidate) = candidate else {
                continue;
            };
            if self.fs.file_exists(&candidate) {
                tracing::debug!(
                    library = %entry.library_key(),
                    path = %candidate.display(),
                    kind = ?location.kind,
                    "Probe matched"
                );
                return Some(candidate);
            }
            tracing::trace!(path = %candidate.display(), "Probe missed");
        }
        None
    }

    /// Resolve every entry of `sources`, in order, into the TPA and search
    /// directory lists.
    ///
    /// The first source whose entry claims an asset name keeps it. An
    /// entry found nowhere fails the whole resolution, except a missing
    /// apphost which is only warned about. An app source whose manifest
    /// does not exist is replaced by a scan of its directory.
    pub fn resolve(&self, sources: &[ManifestSource<'_>]) -> Result<ResolvedAssets> {
        let mut tpa = Vec::new();
        let mut tpa_names = HashSet::new();
        let mut native = SearchDirs::new(self.servicing_root.as_deref());
        let mut resources = SearchDirs::new(self.servicing_root.as_deref());

        for source in sources {
            if source.origin == ManifestOrigin::App && !source.manifest.exists() {
                self.scan_app_dir(&source.dir, &mut tpa, &mut tpa_names);
                continue;
            }

            for entry in source.manifest.resolve_entries(&self.rid, &self.graph) {
                if entry.is_placeholder() {
                    tracing::trace!(library = %entry.library_key(), "Skipping placeholder asset");
                    continue;
                }
                if entry.asset_type == AssetType::Runtime && tpa_names.contains(&entry.asset_name) {
                    tracing::debug!(
                        asset = %entry.asset_name,
                        library = %entry.library_key(),
                        "Asset already on the TPA - skipping"
                    );
                    continue;
                }

                let Some(path) = self.probe_required(&entry, source)? else {
                    continue;
                };
                match entry.asset_type {
                    AssetType::Runtime => {
                        tpa_names.insert(entry.asset_name.clone());
                        tpa.push(path);
                    }
                    AssetType::Native => {
                        if let Some(dir) = path.parent() {
                            native.add(self.fs, dir);
                        }
                    }
                    AssetType::Resources => {
                        if let Some(dir) = path.parent().and_then(Path::parent) {
                            resources.add(self.fs, dir);
                        }
                    }
                }
            }
        }

        for location in &self.locations {
            if location.kind == ProbeKind::App {
                native.add(self.fs, &location.dir);
            }
        }
        for location in &self.locations {
            if matches!(location.kind, ProbeKind::Framework(_)) {
                native.add(self.fs, &location.dir);
            }
        }

        Ok(ResolvedAssets {
            tpa,
            native_search_dirs: native.into_vec(),
            resource_search_dirs: resources.into_vec(),
        })
    }

    fn probe_required(
        &self,
        entry: &ManifestEntry,
        source: &ManifestSource<'_>,
    ) -> Result<Option<PathBuf>> {
        if let Some(path) = self.probe(entry, source) {
            return Ok(Some(path));
        }
        if is_apphost(entry) {
            tracing::warn!(
                library = %entry.library_key(),
                asset = %entry.relative_path,
                "Application host asset not found - continuing without it"
            );
            return Ok(None);
        }
        Err(Error::AssetNotFound {
            library: entry.library_name.clone(),
            version: entry.library_version.clone(),
            relative_path: entry.relative_path.clone(),
        })
    }

    /// Add assemblies found directly in `dir`, preferring native images
    /// and `.dll` over `.exe`.
    fn scan_app_dir(&self, dir: &Path, tpa: &mut Vec<PathBuf>, names: &mut HashSet<String>) {
        tracing::debug!(dir = %dir.display(), "No app manifest - scanning application directory");
        let mut best: BTreeMap<String, (usize, PathBuf)> = BTreeMap::new();
        for file_name in self.fs.list_entries(dir) {
            let lower = file_name.to_ascii_lowercase();
            let Some((rank, ext)) = SCAN_EXTENSIONS
                .iter()
                .enumerate()
                .find(|(_, ext)| lower.ends_with(**ext))
            else {
                continue;
            };
            let path = dir.join(&file_name);
            if !self.fs.file_exists(&path) {
                continue;
            }
            let asset = file_name[..file_name.len() - ext.len()].to_string();
            match best.entry(asset) {
                Entry::Vacant(slot) => {
                    slot.insert((rank, path));
                }
                Entry::Occupied(mut slot) if rank < slot.get().0 => {
                    slot.insert((rank, path));
                }
                Entry::Occupied(_) => {}
            }
        }
        for (asset, (_, path)) in best {
            if names.insert(asset) {
                tpa.push(path);
            }
        }
    }
}

fn is_apphost(entry: &ManifestEntry) -> bool {
    entry.asset_type == AssetType::Native
        && (entry.asset_name.eq_ignore_ascii_case("apphost")
            || entry.library_name.contains("DotNetAppHost"))
}

/// `<dir>/<library path>/<relative path>`.
fn package_path(dir: &Path, entry: &ManifestEntry) -> PathBuf {
    let package = join_relative(dir, &entry.package_directory());
    join_relative(&package, &entry.relative_path)
}

/// Flattened layout of an app or framework directory. RID-specific app
/// assets keep their `runtimes/<rid>/...` path; resources sit in a culture
/// subdirectory.
fn local_path(dir: &Path, entry: &ManifestEntry, keep_rid_layout: bool) -> PathBuf {
    if keep_rid_layout && entry.is_rid_specific {
        return join_relative(dir, &entry.relative_path);
    }
    if entry.asset_type == AssetType::Resources {
        if let Some(culture) = entry.relative_path.rsplit('/').nth(1) {
            return dir.join(culture).join(entry.file_name());
        }
    }
    dir.join(entry.file_name())
}

/// Join a `/`-separated relative path component by component.
fn join_relative(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    path.extend(relative.split('/').filter(|c| !c.is_empty()));
    path
}

/// Directory list deduplicated by real path, serviced entries first.
struct SearchDirs {
    servicing_root: Option<NormalizedPath>,
    seen: HashSet<NormalizedPath>,
    serviced: Vec<PathBuf>,
    other: Vec<PathBuf>,
}

impl SearchDirs {
    fn new(servicing_root: Option<&Path>) -> Self {
        Self {
            servicing_root: servicing_root.map(NormalizedPath::new),
            seen: HashSet::new(),
            serviced: Vec::new(),
            other: Vec::new(),
        }
    }

    fn add(&mut self, fs: &impl FileSystem, dir: &Path) {
        let real = fs.realpath(dir);
        let key = NormalizedPath::new(&real);
        let serviced = self
            .servicing_root
            .as_ref()
            .is_some_and(|root| key.starts_with(root));
        if !self.seen.insert(key) {
            return;
        }
        if serviced {
            self.serviced.push(real);
        } else {
            self.other.push(real);
        }
    }

    fn into_vec(self) -> Vec<PathBuf> {
        let mut out = self.serviced;
        out.extend(self.other);
        out
    }
}
