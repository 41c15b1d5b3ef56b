//! Typed accessors over `serde_json` objects that report mistyped fields
//! as parse errors.

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::{Error, Result};

pub(crate) fn object<'a>(
    path: &Path,
    parent: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(Error::parse(path, format!("'{key}' must be an object"))),
    }
}

pub(crate) fn string<'a>(
    path: &Path,
    parent: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a str>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(Error::parse(path, format!("'{key}' must be a string"))),
    }
}

pub(crate) fn boolean(path: &Path, parent: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(Error::parse(path, format!("'{key}' must be a boolean"))),
    }
}

pub(crate) fn integer(path: &Path, parent: &Map<String, Value>, key: &str) -> Result<Option<i64>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| Error::parse(path, format!("'{key}' must be an integer"))),
        Some(_) => Err(Error::parse(path, format!("'{key}' must be an integer"))),
    }
}

/// A string or an array of strings.
pub(crate) fn string_list(path: &Path, parent: &Map<String, Value>, key: &str) -> Result<Vec<String>> {
    match parent.get(key) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::String(s)) => Ok(vec![s.clone()]),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::parse(path, format!("'{key}' must contain only strings"))
                })
            })
            .collect(),
        Some(_) => Err(Error::parse(
            path,
            format!("'{key}' must be a string or an array of strings"),
        )),
    }
}

/// Render a scalar property value the way the runtime receives it.
pub(crate) fn scalar_to_string(path: &Path, key: &str, value: &Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(Error::parse(
            path,
            format!("configProperties '{key}' must be a string, number or boolean"),
        )),
    }
}
