//! Loading host JSON documents into a `serde_json::Value` tree.

use std::path::Path;

use serde_json::Value;

use crate::{Error, FileSystem, Result};

/// Read and parse a JSON document whose root must be an object.
///
/// A missing file is `Ok(None)`; a present file that fails to parse is an
/// error carrying the parser's message.
pub fn read_json(fs: &impl FileSystem, path: &Path) -> Result<Option<Value>> {
    if !fs.file_exists(path) {
        tracing::debug!(?path, "JSON document not present");
        return Ok(None);
    }

    let content = fs.read_to_string(path)?;
    // Tolerate a UTF-8 byte order mark written by some editors.
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);
    let value: Value = serde_json::from_str(content).map_err(|e| Error::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !value.is_object() {
        return Err(Error::NotAnObject {
            path: path.to_path_buf(),
        });
    }

    Ok(Some(value))
}
