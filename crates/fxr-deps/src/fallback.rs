//! RID fallback over a parsed manifest and expansion into [`ManifestEntry`]
//! values.

use std::collections::BTreeMap;

use crate::asset::AssetType;
use crate::entry::{ManifestEntry, asset_name_of};
use crate::library::LibraryKey;
use crate::manifest::DependencyManifest;
use crate::rid::RidFallbackGraph;

/// The RID chosen for each library and asset type that declares
/// RID-specific assets.
///
/// Computed once per manifest load; a pair without a selection falls back
/// to the RID-agnostic assets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RidSelection {
    host_rid: String,
    chosen: BTreeMap<(LibraryKey, AssetType), String>,
}

impl RidSelection {
    pub fn host_rid(&self) -> &str {
        &self.host_rid
    }

    pub fn chosen_rid(&self, key: &LibraryKey, asset_type: AssetType) -> Option<&str> {
        self.chosen
            .get(&(key.clone(), asset_type))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.chosen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

impl DependencyManifest {
    /// Pick, for every library with RID-specific assets, the first RID in
    /// `host_rid`'s fallback chain that has assets of each type.
    pub fn perform_rid_fallback(&self, host_rid: &str, graph: &RidFallbackGraph) -> RidSelection {
        let mut selection = RidSelection {
            host_rid: host_rid.to_string(),
            chosen: BTreeMap::new(),
        };
        let candidates = graph.candidates(host_rid);

        for key in self.library_order() {
            let Some(by_rid) = self.rid_assets(key) else {
                continue;
            };
            for asset_type in AssetType::ALL {
                let matched = candidates.iter().find(|rid| {
                    by_rid
                        .get(**rid)
                        .is_some_and(|assets| assets.has(asset_type))
                });
                match matched {
                    Some(rid) => {
                        tracing::debug!(library = %key, %asset_type, rid, "Selected RID-specific assets");
                        selection
                            .chosen
                            .insert((key.clone(), asset_type), (*rid).to_string());
                    }
                    None if by_rid.values().any(|a| a.has(asset_type)) => {
                        tracing::debug!(library = %key, %asset_type, host_rid, "No compatible RID-specific assets");
                    }
                    None => {}
                }
            }
        }
        selection
    }

    /// Expand the manifest into entries, grouped by asset type and then by
    /// library order.
    pub fn entries(&self, selection: &RidSelection) -> Vec<ManifestEntry> {
        let mut out = Vec::new();
        for asset_type in AssetType::ALL {
            for key in self.library_order() {
                let Some(library) = self.library(key) else {
                    continue;
                };
                let (paths, rid_specific) = match selection.chosen_rid(key, asset_type) {
                    Some(rid) => (
                        self.rid_assets(key)
                            .and_then(|by_rid| by_rid.get(rid))
                            .map(|a| a.get(asset_type))
                            .unwrap_or_default(),
                        true,
                    ),
                    None => (
                        self.assets(key)
                            .map(|a| a.get(asset_type))
                            .unwrap_or_default(),
                        false,
                    ),
                };
                out.extend(paths.iter().map(|relative| ManifestEntry {
                    library_name: key.name.clone(),
                    library_version: key.version.clone(),
                    library_type: library.library_type.clone(),
                    library_path: library.path.clone(),
                    library_hash_path: library.hash_path.clone(),
                    asset_type,
                    relative_path: relative.clone(),
                    asset_name: asset_name_of(relative),
                    is_serviceable: library.serviceable,
                    is_rid_specific: rid_specific,
                }));
            }
        }
        out
    }

    /// [`perform_rid_fallback`](Self::perform_rid_fallback) followed by
    /// [`entries`](Self::entries).
    pub fn resolve_entries(&self, host_rid: &str, graph: &RidFallbackGraph) -> Vec<ManifestEntry> {
        let selection = self.perform_rid_fallback(host_rid, graph);
        self.entries(&selection)
    }
}
