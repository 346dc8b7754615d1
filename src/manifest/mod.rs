//! Package manifest access
//!
//! The manifest is a JSON object. Only `version` and `devDependencies` are
//! interpreted; every other field is carried through verbatim and in its
//! original order.
//!
//! Implementations of [ManifestStore]:
//!
//! - [file::FileManifestStore]: JSON file on disk, overwritten atomically
//! - [mock::MemoryManifestStore]: in-memory document for tests

pub mod file;
pub mod mock;

pub use file::FileManifestStore;
pub use mock::MemoryManifestStore;

use crate::error::{ReleaseError, Result};
use serde::Serialize;
use serde_json::{Map, Value};

pub const VERSION_FIELD: &str = "version";
pub const DEV_DEPENDENCIES_FIELD: &str = "devDependencies";

const INDENT: &[u8] = b"    ";

/// In-memory manifest document
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    fields: Map<String, Value>,
}

impl Manifest {
    /// Wrap a parsed JSON value; it must be an object with a string `version`
    pub fn from_value(value: Value) -> Result<Self> {
        let fields = match value {
            Value::Object(fields) => fields,
            other => {
                return Err(ReleaseError::manifest(format!(
                    "expected a JSON object, found {}",
                    json_kind(&other)
                )))
            }
        };

        match fields.get(VERSION_FIELD) {
            Some(Value::String(_)) => Ok(Manifest { fields }),
            Some(other) => Err(ReleaseError::manifest(format!(
                "`version` must be a string, found {}",
                json_kind(other)
            ))),
            None => Err(ReleaseError::manifest("missing `version` field")),
        }
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| ReleaseError::manifest(format!("invalid JSON: {}", e)))?;
        Self::from_value(value)
    }

    /// Serialise with four-space indentation and a trailing newline
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.fields
            .serialize(&mut ser)
            .map_err(|e| ReleaseError::manifest(format!("cannot serialise: {}", e)))?;

        let mut text = String::from_utf8(buf)
            .map_err(|e| ReleaseError::manifest(format!("cannot serialise: {}", e)))?;
        text.push('\n');
        Ok(text)
    }

    pub fn version(&self) -> &str {
        self.fields
            .get(VERSION_FIELD)
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    pub fn set_version(&mut self, version: &str) {
        self.fields
            .insert(VERSION_FIELD.to_string(), Value::String(version.to_string()));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn dev_dependencies(&self) -> Option<&Value> {
        self.fields.get(DEV_DEPENDENCIES_FIELD)
    }

    /// Drop `devDependencies`, returning it; other fields keep their order
    pub fn remove_dev_dependencies(&mut self) -> Option<Value> {
        let mut removed = None;
        self.fields = std::mem::take(&mut self.fields)
            .into_iter()
            .filter_map(|(key, value)| {
                if key == DEV_DEPENDENCIES_FIELD {
                    removed = Some(value);
                    None
                } else {
                    Some((key, value))
                }
            })
            .collect();
        removed
    }

    /// Put `field` back at the position it had in `original`
    ///
    /// Fields follow `original`'s key order; fields that `original` lacks are
    /// appended in their current order.
    pub fn restore_field(&mut self, field: &str, value: Value, original: &Manifest) {
        let mut current: Vec<(String, Value)> =
            std::mem::take(&mut self.fields).into_iter().collect();
        let mut ordered = Map::new();

        for key in original.fields.keys() {
            if key == field {
                ordered.insert(key.clone(), value.clone());
            } else if let Some(idx) = current.iter().position(|(k, _)| k == key) {
                let (k, v) = current.remove(idx);
                ordered.insert(k, v);
            }
        }

        if !ordered.contains_key(field) {
            ordered.insert(field.to_string(), value);
        }

        for (key, value) in current {
            if !ordered.contains_key(&key) {
                ordered.insert(key, value);
            }
        }

        self.fields = ordered;
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Persisted manifest document
///
/// Every `save` replaces the whole document.
pub trait ManifestStore {
    fn load(&self) -> Result<Manifest>;

    fn save(&mut self, manifest: &Manifest) -> Result<()>;
}
