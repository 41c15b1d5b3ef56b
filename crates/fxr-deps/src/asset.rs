//! Asset categories and per-category path lists.

use std::fmt;

/// The three kinds of files a library contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetType {
    Runtime,
    Native,
    Resources,
}

impl AssetType {
    pub const ALL: [AssetType; 3] = [Self::Runtime, Self::Native, Self::Resources];

    /// Section name inside a target library entry.
    pub fn section(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Native => "native",
            Self::Resources => "resources",
        }
    }

    /// Parse the `assetType` of a `runtimeTargets` entry.
    pub fn from_section(name: &str) -> Option<Self> {
        match name {
            "runtime" => Some(Self::Runtime),
            "native" => Some(Self::Native),
            "resources" => Some(Self::Resources),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Runtime => 0,
            Self::Native => 1,
            Self::Resources => 2,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section())
    }
}

/// Relative asset paths of one library, grouped by [`AssetType`], in
/// declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSet {
    lists: [Vec<String>; 3],
}

impl AssetSet {
    pub fn get(&self, asset_type: AssetType) -> &[String] {
        &self.lists[asset_type.index()]
    }

    pub fn push(&mut self, asset_type: AssetType, relative_path: impl Into<String>) {
        self.lists[asset_type.index()].push(relative_path.into());
    }

    pub fn has(&self, asset_type: AssetType) -> bool {
        !self.get(asset_type).is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.iter().all(Vec::is_empty)
    }
}
