//! Merging `configProperties` across layers.

use std::collections::BTreeMap;

use crate::runtime_config::RuntimeConfig;

/// Merge the properties of several configurations, most specific first.
///
/// The first configuration to define a key wins; later ones only
/// contribute keys not seen yet.
pub fn merge_properties<'a>(
    configs: impl IntoIterator<Item = &'a RuntimeConfig>,
) -> BTreeMap<String, String> {
    let mut merged = BTreeMap::new();
    for config in configs {
        for (key, value) in config.properties() {
            merged
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }
    merged
}
