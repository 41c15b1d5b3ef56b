//! Runtime identifiers and the fallback graph between them.

use std::collections::HashMap;

/// Fallback chains keyed by RID, e.g.
/// `linux-x64 -> [linux, unix-x64, unix, any, base]`.
///
/// Built once from the root manifest and shared read-only by every layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RidFallbackGraph {
    chains: HashMap<String, Vec<String>>,
}

impl RidFallbackGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_chains<I, K, V>(chains: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        Self {
            chains: chains
                .into_iter()
                .map(|(rid, chain)| (rid.into(), chain.into_iter().map(Into::into).collect()))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    /// The declared fallbacks of `rid`, in order.
    pub fn fallbacks(&self, rid: &str) -> &[String] {
        self.chains.get(rid).map(Vec::as_slice).unwrap_or_default()
    }

    /// RIDs to try for `rid`: itself first, then its fallbacks, each once.
    pub fn candidates<'a>(&'a self, rid: &'a str) -> Vec<&'a str> {
        let mut out = vec![rid];
        for fallback in self.fallbacks(rid) {
            if !out.contains(&fallback.as_str()) {
                out.push(fallback);
            }
        }
        out
    }
}

/// Best-effort RID of the running host, e.g. `linux-x64` or `osx-arm64`.
pub fn current_rid() -> String {
    let os = match std::env::consts::OS {
        "windows" => "win",
        "macos" => "osx",
        "linux" if cfg!(target_env = "musl") => "linux-musl",
        other => other,
    };
    let arch = match std::env::consts::ARCH {
        "x86_64" => "x64",
        "x86" => "x86",
        "aarch64" => "arm64",
        "arm" => "arm",
        other => other,
    };
    format!("{os}-{arch}")
}
