//! Parsing one runtime configuration into effective framework references.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use fxr_fs::{FileSystem, read_json};
use fxr_version::{FrameworkReference, FxVersion, RollForwardSettings, RollForwardSpec};
use serde_json::{Map, Value};

use crate::env::HostEnvironment;
use crate::error::{Error, Result};
use crate::overrides::OverrideSettings;
use crate::value;

/// A framework bundled with a self-contained application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludedFramework {
    pub name: String,
    pub version: FxVersion,
}

/// The effective configuration of one application or framework layer.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    path: PathBuf,
    dev_path: Option<PathBuf>,
    exists: bool,
    tfm: Option<String>,
    settings: RollForwardSettings,
    frameworks: Vec<FrameworkReference>,
    included_frameworks: Vec<IncludedFramework>,
    probe_paths: Vec<PathBuf>,
    properties: BTreeMap<String, String>,
}

/// Values seeded by the developer configuration file.
#[derive(Debug, Default)]
struct DevSeed {
    probe_paths: Vec<PathBuf>,
    properties: BTreeMap<String, String>,
}

impl RuntimeConfig {
    /// Parse the configuration at `path`, seeded by `dev_path`.
    ///
    /// `inherited` replaces the built-in defaults (framework layers inherit
    /// the settings of the layer that referenced them); `overrides` are
    /// applied last and win over everything.
    ///
    /// Missing files are not errors. A present file that does not parse,
    /// or that breaks a roll-forward rule, fails the whole configuration.
    pub fn parse(
        fs: &impl FileSystem,
        path: &Path,
        dev_path: Option<&Path>,
        inherited: Option<&RollForwardSettings>,
        overrides: Option<&OverrideSettings>,
        env: &HostEnvironment,
    ) -> Result<Self> {
        let seed = match dev_path {
            Some(dev) => parse_dev(fs, dev)?,
            None => DevSeed::default(),
        };

        // Tier 1: defaults, or what the referencing layer resolved to
        let mut settings = RollForwardSettings::defaults();
        if let Some(inherited) = inherited {
            settings.merge(inherited);
        }

        // Tier 2: environment defaults
        let env_settings = env.roll_forward_settings()?;
        settings.merge(&env_settings);

        let mut config = Self {
            path: path.to_path_buf(),
            dev_path: dev_path.map(Path::to_path_buf),
            exists: false,
            tfm: None,
            settings,
            frameworks: Vec::new(),
            included_frameworks: Vec::new(),
            probe_paths: Vec::new(),
            properties: BTreeMap::new(),
        };

        if let Some(overrides) = overrides {
            config
                .probe_paths
                .extend(overrides.additional_probing_paths.iter().cloned());
        }

        match read_json(fs, path)? {
            Some(root) => {
                config.exists = true;
                config.apply_document(&root, &env_settings, overrides)?;
            }
            None => {
                tracing::debug!(?path, "Runtime config not found - using defaults");
            }
        }

        // Dev values only fill in what the primary file left unset.
        for (key, value) in seed.properties {
            config.properties.entry(key).or_insert(value);
        }
        config.probe_paths.extend(seed.probe_paths);
        dedup_paths(&mut config.probe_paths);

        if let Some(overrides) = overrides {
            config.settings.merge(&overrides.roll_forward_settings());
        }

        tracing::debug!(
            path = %config.path.display(),
            frameworks = config.frameworks.len(),
            policy = %config.settings.effective_policy(),
            "Parsed runtime config"
        );
        Ok(config)
    }

    fn apply_document(
        &mut self,
        root: &Value,
        env_settings: &RollForwardSettings,
        overrides: Option<&OverrideSettings>,
    ) -> Result<()> {
        let path = self.path.clone();
        let Some(options) = root
            .as_object()
            .map(|obj| value::object(&path, obj, "runtimeOptions"))
            .transpose()?
            .flatten()
        else {
            return Ok(());
        };

        self.tfm = value::string(&path, options, "tfm")?.map(str::to_string);

        // Tier 3: top-level options
        if let Some(spec) = scope_spec(&path, "runtimeOptions", options)? {
            self.settings.apply_spec(&spec);
        }

        self.probe_paths.extend(
            value::string_list(&path, options, "additionalProbingPaths")?
                .into_iter()
                .map(PathBuf::from),
        );
        self.properties = parse_properties(&path, options)?;
        self.included_frameworks = parse_included(&path, options)?;

        // Tier 4 and 5: per-framework entries
        let entries = framework_entries(&path, options)?;
        let mut seen = HashSet::new();
        for (index, entry) in entries.into_iter().enumerate() {
            let name = value::string(&path, entry, "name")?
                .filter(|n| !n.is_empty())
                .ok_or_else(|| Error::parse(&path, "framework reference is missing 'name'"))?;
            let version_text = value::string(&path, entry, "version")?.ok_or_else(|| {
                Error::parse(&path, format!("framework '{name}' is missing 'version'"))
            })?;
            if !seen.insert(name.to_string()) {
                return Err(Error::parse(
                    &path,
                    format!("framework '{name}' is referenced more than once"),
                ));
            }
            let version = FxVersion::parse(version_text, false)
                .map_err(|e| Error::from_version(&path, e))?;

            let mut fx_settings = self.settings;
            let scope = format!("framework '{name}'");
            if let Some(spec) = scope_spec(&path, &scope, entry)? {
                fx_settings.apply_spec(&spec);
            }
            fx_settings.merge(env_settings);

            let mut reference = match overrides {
                Some(overrides) => {
                    fx_settings.merge(&overrides.roll_forward_settings());
                    let mut reference = FrameworkReference::new(name, version, &fx_settings);
                    if let Some(pinned) = overrides.pins(index, name) {
                        reference.requested_version = pinned.clone();
                        reference.use_exact_version = true;
                    }
                    reference
                }
                None => FrameworkReference::new(name, version, &fx_settings),
            };
            if reference.requested_version.is_prerelease() {
                reference.prefer_release = false;
            }

            tracing::debug!(%reference, "Framework reference");
            self.frameworks.push(reference);
        }
        Ok(())
    }

    /// Path of the primary configuration file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the developer configuration file, if one was consulted.
    pub fn dev_path(&self) -> Option<&Path> {
        self.dev_path.as_deref()
    }

    /// Whether the primary file was present on disk.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Target framework moniker, e.g. `netcoreapp2.1`.
    pub fn tfm(&self) -> Option<&str> {
        self.tfm.as_deref()
    }

    /// Effective top-level roll-forward settings, inherited by the
    /// frameworks this configuration references.
    pub fn settings(&self) -> &RollForwardSettings {
        &self.settings
    }

    pub fn frameworks(&self) -> &[FrameworkReference] {
        &self.frameworks
    }

    pub fn included_frameworks(&self) -> &[IncludedFramework] {
        &self.included_frameworks
    }

    /// True when the configuration references shared frameworks.
    pub fn is_framework_dependent(&self) -> bool {
        !self.frameworks.is_empty()
    }

    /// Additional probing paths: caller overrides, then the primary file,
    /// then the dev file.
    pub fn probe_paths(&self) -> &[PathBuf] {
        &self.probe_paths
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }
}

fn parse_dev(fs: &impl FileSystem, path: &Path) -> Result<DevSeed> {
    let Some(root) = read_json(fs, path)? else {
        return Ok(DevSeed::default());
    };
    let Some(options) = root
        .as_object()
        .map(|obj| value::object(path, obj, "runtimeOptions"))
        .transpose()?
        .flatten()
    else {
        return Ok(DevSeed::default());
    };

    tracing::debug!(?path, "Seeding from dev runtime config");
    Ok(DevSeed {
        probe_paths: value::string_list(path, options, "additionalProbingPaths")?
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        properties: parse_properties(path, options)?,
    })
}

fn scope_spec(path: &Path, scope: &str, obj: &Map<String, Value>) -> Result<Option<RollForwardSpec>> {
    let roll_forward = value::string(path, obj, "rollForward")?;
    let legacy = value::integer(path, obj, "rollForwardOnNoCandidateFx")?;
    let apply_patches = value::boolean(path, obj, "applyPatches")?;
    RollForwardSpec::from_fields(scope, roll_forward, legacy, apply_patches)
        .map_err(|e| Error::from_version(path, e))
}

fn parse_properties(path: &Path, options: &Map<String, Value>) -> Result<BTreeMap<String, String>> {
    let Some(props) = value::object(path, options, "configProperties")? else {
        return Ok(BTreeMap::new());
    };
    props
        .iter()
        .map(|(key, v)| Ok((key.clone(), value::scalar_to_string(path, key, v)?)))
        .collect()
}

fn framework_entries<'a>(
    path: &Path,
    options: &'a Map<String, Value>,
) -> Result<Vec<&'a Map<String, Value>>> {
    let single = value::object(path, options, "framework")?;
    let many = match options.get("frameworks") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(items),
        Some(_) => return Err(Error::parse(path, "'frameworks' must be an array")),
    };

    match (single, many) {
        (Some(_), Some(_)) => Err(Error::parse(
            path,
            "'framework' and 'frameworks' cannot both be specified",
        )),
        (Some(single), None) => Ok(vec![single]),
        (None, Some(items)) => items
            .iter()
            .map(|item| {
                item.as_object()
                    .ok_or_else(|| Error::parse(path, "'frameworks' entries must be objects"))
            })
            .collect(),
        (None, None) => Ok(Vec::new()),
    }
}

fn parse_included(path: &Path, options: &Map<String, Value>) -> Result<Vec<IncludedFramework>> {
    let items = match options.get("includedFrameworks") {
        None | Some(Value::Null) => return Ok(Vec::new()),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(Error::parse(path, "'includedFrameworks' must be an array")),
    };

    items
        .iter()
        .map(|item| {
            let obj = item
                .as_object()
                .ok_or_else(|| Error::parse(path, "'includedFrameworks' entries must be objects"))?;
            let name = value::string(path, obj, "name")?
                .ok_or_else(|| Error::parse(path, "included framework is missing 'name'"))?;
            let version = value::string(path, obj, "version")?
                .ok_or_else(|| Error::parse(path, "included framework is missing 'version'"))?;
            Ok(IncludedFramework {
                name: name.to_string(),
                version: FxVersion::parse(version, false)
                    .map_err(|e| Error::from_version(path, e))?,
            })
        })
        .collect()
}

fn dedup_paths(paths: &mut Vec<PathBuf>) {
    let mut seen = HashSet::new();
    paths.retain(|p| seen.insert(p.clone()));
}
