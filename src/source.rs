//! Key/value sources for constraints and candidate values
//!
//! Files are read with the `config` crate. The extension picks the format:
//! `.json` and `.toml` as named, anything else as INI. Sections are flattened
//! to `section.key` names.

use std::collections::BTreeMap;
use std::path::Path;

use config_crate::{Config, File, FileFormat};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::SourceError;

static ABSENT: Value = Value::Null;

/// Read a config file into a flat, sorted `key -> value` mapping
pub fn load_mapping(path: impl AsRef<Path>) -> Result<BTreeMap<String, Value>, SourceError> {
    let path = path.as_ref();
    let read_error = |source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    };

    let config = Config::builder()
        .add_source(File::from(path).format(format_for(path)).required(true))
        .build()
        .map_err(read_error)?;
    let table: Map<String, Value> = config.try_deserialize().map_err(read_error)?;

    let mut out = BTreeMap::new();
    flatten("", table, &mut out);
    debug!(path = %path.display(), entries = out.len(), "loaded mapping");
    Ok(out)
}

fn format_for(path: &Path) -> FileFormat {
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => FileFormat::Json,
        Some("toml") => FileFormat::Toml,
        _ => FileFormat::Ini,
    }
}

fn flatten(prefix: &str, table: Map<String, Value>, out: &mut BTreeMap<String, Value>) {
    for (key, value) in table {
        let name = if prefix.is_empty() {
            key
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::Object(inner) => flatten(&name, inner, out),
            other => {
                out.insert(name, other);
            }
        }
    }
}

/// Declared keys and their constraint expressions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSource {
    entries: BTreeMap<String, String>,
}

impl ConstraintSource {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let mut entries = BTreeMap::new();
        for (key, value) in load_mapping(path)? {
            match value {
                Value::String(expr) => {
                    entries.insert(key, expr);
                }
                _ => return Err(SourceError::NotText { key }),
            }
        }
        Ok(Self { entries })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Candidate values by key
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueSource {
    entries: BTreeMap<String, Value>,
}

impl ValueSource {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        Ok(Self { entries: load_mapping(path)? })
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Self {
            entries: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Value for `key`, or `Value::Null` when the key is missing
    pub fn get(&self, key: &str) -> &Value {
        self.entries.get(key).unwrap_or(&ABSENT)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
