//! Parsing and reconciling a dependency manifest.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use fxr_fs::{FileSystem, NormalizedPath, read_json};
use serde_json::{Map, Value};

use crate::asset::{AssetSet, AssetType};
use crate::error::{Error, Result};
use crate::library::{Library, LibraryKey};
use crate::rid::RidFallbackGraph;

/// The parsed form of one `*.deps.json`.
///
/// Immutable once parsed: later resolution stages only read it.
#[derive(Debug, Clone, Default)]
pub struct DependencyManifest {
    path: PathBuf,
    exists: bool,
    runtime_target: Option<String>,
    portable: bool,
    libraries: HashMap<LibraryKey, Library>,
    /// Libraries of the selected target that also appear in `libraries`,
    /// in target order.
    order: Vec<LibraryKey>,
    assets: HashMap<LibraryKey, AssetSet>,
    rid_assets: HashMap<LibraryKey, BTreeMap<String, AssetSet>>,
    rid_fallback_graph: Option<RidFallbackGraph>,
}

impl DependencyManifest {
    /// Read and parse the manifest at `path`.
    ///
    /// A missing file yields an empty manifest whose [`exists`](Self::exists)
    /// is false; a malformed one is an error.
    pub fn load(fs: &impl FileSystem, path: &Path) -> Result<Self> {
        match read_json(fs, path)? {
            Some(root) => Self::from_value(path, &root),
            None => {
                tracing::debug!(?path, "Dependency manifest not found");
                Ok(Self {
                    path: path.to_path_buf(),
                    portable: true,
                    ..Self::default()
                })
            }
        }
    }

    /// Parse a manifest from an already-parsed JSON tree.
    pub fn from_value(path: &Path, root: &Value) -> Result<Self> {
        let root = root
            .as_object()
            .ok_or_else(|| Error::parse(path, "root is not a JSON object"))?;

        let runtime_target = match root.get("runtimeTarget") {
            None | Some(Value::Null) => None,
            Some(Value::Object(rt)) => match rt.get("name") {
                Some(Value::String(name)) => Some(name.clone()),
                None | Some(Value::Null) => None,
                Some(_) => return Err(Error::parse(path, "'runtimeTarget.name' must be a string")),
            },
            // Older producers wrote the target name directly.
            Some(Value::String(name)) => Some(name.clone()),
            Some(_) => return Err(Error::parse(path, "'runtimeTarget' must be an object")),
        };

        let libraries = parse_libraries(path, root)?;
        let rid_fallback_graph = parse_runtimes(path, root)?;

        let mut manifest = Self {
            path: path.to_path_buf(),
            exists: true,
            portable: true,
            libraries,
            rid_fallback_graph,
            ..Self::default()
        };

        let targets = match root.get("targets") {
            None | Some(Value::Null) => None,
            Some(Value::Object(targets)) => Some(targets),
            Some(_) => return Err(Error::parse(path, "'targets' must be an object")),
        };

        if let Some(targets) = targets {
            let selected = match &runtime_target {
                Some(name) => Some((
                    name.as_str(),
                    targets.get(name).ok_or_else(|| {
                        Error::parse(path, format!("runtime target '{name}' not found in 'targets'"))
                    })?,
                )),
                None => targets.iter().next().map(|(k, v)| (k.as_str(), v)),
            };

            if let Some((name, target)) = selected {
                let target = target
                    .as_object()
                    .ok_or_else(|| Error::parse(path, format!("target '{name}' must be an object")))?;
                manifest.portable = !name.contains('/');
                manifest.runtime_target = Some(name.to_string());
                manifest.reconcile(target)?;
            }
        }

        tracing::debug!(
            path = %manifest.path.display(),
            libraries = manifest.order.len(),
            portable = manifest.portable,
            "Parsed dependency manifest"
        );
        Ok(manifest)
    }

    /// Collect assets of every target library that `libraries` knows about.
    fn reconcile(&mut self, target: &Map<String, Value>) -> Result<()> {
        let path = self.path.clone();
        for (key_text, entry) in target {
            let key = LibraryKey::parse(key_text).ok_or_else(|| {
                Error::parse(&path, format!("target entry '{key_text}' is not 'name/version'"))
            })?;
            if !self.libraries.contains_key(&key) {
                // Newer producers may emit target-only entries.
                tracing::warn!(library = %key, path = %path.display(), "Target library missing from 'libraries' - skipping");
                continue;
            }
            let entry = entry.as_object().ok_or_else(|| {
                Error::parse(&path, format!("target entry '{key_text}' must be an object"))
            })?;

            let mut assets = AssetSet::default();
            for asset_type in AssetType::ALL {
                for relative in section_paths(&path, key_text, entry, asset_type.section())? {
                    assets.push(asset_type, relative);
                }
            }

            if self.portable {
                let rid_assets = parse_runtime_targets(&path, key_text, entry)?;
                if !rid_assets.is_empty() {
                    self.rid_assets.insert(key.clone(), rid_assets);
                }
            }

            self.assets.insert(key.clone(), assets);
            self.order.push(key);
        }
        debug_assert!(self.order.iter().all(|k| self.libraries.contains_key(k)));
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the manifest file was present on disk.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Name of the selected target, e.g. `.NETCoreApp,Version=v2.1`.
    pub fn runtime_target(&self) -> Option<&str> {
        self.runtime_target.as_deref()
    }

    /// Portable manifests describe RID-specific assets separately; others
    /// were produced for one RID already.
    pub fn is_portable(&self) -> bool {
        self.portable
    }

    pub fn library(&self, key: &LibraryKey) -> Option<&Library> {
        self.libraries.get(key)
    }

    pub fn libraries(&self) -> &HashMap<LibraryKey, Library> {
        &self.libraries
    }

    /// Target libraries in declaration order.
    pub fn library_order(&self) -> &[LibraryKey] {
        &self.order
    }

    pub fn assets(&self, key: &LibraryKey) -> Option<&AssetSet> {
        self.assets.get(key)
    }

    /// RID-specific assets of a library, keyed by declared RID.
    pub fn rid_assets(&self, key: &LibraryKey) -> Option<&BTreeMap<String, AssetSet>> {
        self.rid_assets.get(key)
    }

    pub fn rid_fallback_graph(&self) -> Option<&RidFallbackGraph> {
        self.rid_fallback_graph.as_ref()
    }

    /// True when the target declares `key` with at least one asset of
    /// `asset_type`, RID-specific or not.
    pub fn contains_asset(&self, key: &LibraryKey, asset_type: AssetType) -> bool {
        self.assets.get(key).is_some_and(|a| a.has(asset_type))
            || self
                .rid_assets
                .get(key)
                .is_some_and(|by_rid| by_rid.values().any(|a| a.has(asset_type)))
    }
}

fn parse_libraries(path: &Path, root: &Map<String, Value>) -> Result<HashMap<LibraryKey, Library>> {
    let libraries = match root.get("libraries") {
        None | Some(Value::Null) => return Ok(HashMap::new()),
        Some(Value::Object(libraries)) => libraries,
        Some(_) => return Err(Error::parse(path, "'libraries' must be an object")),
    };

    let mut out = HashMap::with_capacity(libraries.len());
    for (key_text, value) in libraries {
        let key = LibraryKey::parse(key_text).ok_or_else(|| {
            Error::parse(path, format!("library '{key_text}' is not 'name/version'"))
        })?;
        let obj = value
            .as_object()
            .ok_or_else(|| Error::parse(path, format!("library '{key_text}' must be an object")))?;

        let missing = |field: &'static str| Error::MissingField {
            path: path.to_path_buf(),
            library: key_text.clone(),
            field,
        };
        let library_type = obj
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| missing("type"))?;
        let serviceable = obj
            .get("serviceable")
            .and_then(Value::as_bool)
            .ok_or_else(|| missing("serviceable"))?;
        let optional = |field: &str| obj.get(field).and_then(Value::as_str).map(str::to_string);

        out.insert(
            key,
            Library {
                library_type: library_type.to_string(),
                serviceable,
                content_hash: optional("sha512"),
                path: optional("path"),
                hash_path: optional("hashPath"),
            },
        );
    }
    Ok(out)
}

fn parse_runtimes(path: &Path, root: &Map<String, Value>) -> Result<Option<RidFallbackGraph>> {
    let runtimes = match root.get("runtimes") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(runtimes)) => runtimes,
        Some(_) => return Err(Error::parse(path, "'runtimes' must be an object")),
    };

    let mut chains = Vec::with_capacity(runtimes.len());
    for (rid, fallbacks) in runtimes {
        let fallbacks = fallbacks
            .as_array()
            .ok_or_else(|| Error::parse(path, format!("runtimes '{rid}' must be an array")))?
            .iter()
            .map(|v| {
                v.as_str().map(str::to_string).ok_or_else(|| {
                    Error::parse(path, format!("runtimes '{rid}' must contain only strings"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        chains.push((rid.clone(), fallbacks));
    }
    Ok(Some(RidFallbackGraph::from_chains(chains)))
}

/// Relative paths of one asset section (`runtime`, `native`, `resources`).
fn section_paths(
    path: &Path,
    library: &str,
    entry: &Map<String, Value>,
    section: &str,
) -> Result<Vec<String>> {
    match entry.get(section) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Object(files)) => Ok(files.keys().map(|k| asset_path(k)).collect()),
        Some(_) => Err(Error::parse(
            path,
            format!("'{section}' of '{library}' must be an object"),
        )),
    }
}

/// Asset keys are stored with `/` separators whatever the manifest used.
fn asset_path(key: &str) -> String {
    NormalizedPath::new(key).as_str().to_string()
}

fn parse_runtime_targets(
    path: &Path,
    library: &str,
    entry: &Map<String, Value>,
) -> Result<BTreeMap<String, AssetSet>> {
    let files = match entry.get("runtimeTargets") {
        None | Some(Value::Null) => return Ok(BTreeMap::new()),
        Some(Value::Object(files)) => files,
        Some(_) => {
            return Err(Error::parse(
                path,
                format!("'runtimeTargets' of '{library}' must be an object"),
            ));
        }
    };

    let mut by_rid: BTreeMap<String, AssetSet> = BTreeMap::new();
    for (relative, props) in files {
        let field = |name: &str| props.get(name).and_then(Value::as_str);
        let rid = field("rid").ok_or_else(|| {
            Error::parse(path, format!("runtimeTargets '{relative}' of '{library}' has no 'rid'"))
        })?;
        let asset_type = field("assetType").ok_or_else(|| {
            Error::parse(
                path,
                format!("runtimeTargets '{relative}' of '{library}' has no 'assetType'"),
            )
        })?;
        let Some(asset_type) = AssetType::from_section(asset_type) else {
            tracing::debug!(%library, %relative, asset_type, "Ignoring unknown runtimeTargets asset type");
            continue;
        };
        by_rid
            .entry(rid.to_string())
            .or_default()
            .push(asset_type, asset_path(relative));
    }
    Ok(by_rid)
}
