//! The resolved unit of work handed to the probe pipeline.

use serde::Serialize;

use crate::PLACEHOLDER_FILE_NAME;
use crate::asset::AssetType;
use crate::library::LibraryKey;

/// One asset of one library, ready to be located on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    pub library_name: String,
    pub library_version: String,
    pub library_type: String,
    /// Package-layout directory (`libraries[...].path`), if declared.
    pub library_path: Option<String>,
    pub library_hash_path: Option<String>,
    #[serde(serialize_with = "serialize_asset_type")]
    pub asset_type: AssetType,
    /// Path relative to the package root, always with `/` separators.
    pub relative_path: String,
    /// File name without extension, used to deduplicate assemblies.
    pub asset_name: String,
    pub is_serviceable: bool,
    pub is_rid_specific: bool,
}

impl ManifestEntry {
    pub fn library_key(&self) -> LibraryKey {
        LibraryKey::new(&self.library_name, &self.library_version)
    }

    /// File name component of the relative path.
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// Entries pointing at `_._` stand for empty package folders; they
    /// count for library existence but have nothing to load.
    pub fn is_placeholder(&self) -> bool {
        self.file_name() == PLACEHOLDER_FILE_NAME
    }

    /// Directory used in package-layout probe locations.
    pub fn package_directory(&self) -> String {
        self.library_path
            .clone()
            .unwrap_or_else(|| self.library_key().default_package_path())
    }
}

fn serialize_asset_type<S: serde::Serializer>(
    asset_type: &AssetType,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(asset_type.section())
}

/// Simple file name without extension: `lib/de/Foo.resources.dll` gives
/// `Foo.resources`.
pub(crate) fn asset_name_of(relative_path: &str) -> String {
    let file_name = relative_path.rsplit('/').next().unwrap_or(relative_path);
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name[..idx].to_string(),
        _ => file_name.to_string(),
    }
}
