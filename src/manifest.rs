// src/manifest.rs
//! The project's `package.json` and fragment merging.

#![deny(missing_docs)]

use crate::error::{ScaffoldError, ScaffoldResult};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the project manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Registry-only identifier that is never written back.
pub const INTERNAL_ID_KEY: &str = "_id";

const DEPENDENCY_KEYS: [&str; 2] = ["dependencies", "devDependencies"];

/// Keys whose object values are written with sorted entries.
const SORTED_KEYS: [&str; 4] = [
    "dependencies",
    "devDependencies",
    "optionalDependencies",
    "peerDependencies",
];

/// Shallow, last-writer-wins merge of `fragments` in iteration order.
///
/// Only top-level keys are considered: a later fragment replaces the whole
/// value of a key an earlier one set. The position of a key is the position
/// of its first occurrence.
pub fn merge_fragments<'a, I>(fragments: I) -> Map<String, Value>
where
    I: IntoIterator<Item = &'a Map<String, Value>>,
{
    let mut merged = Map::new();
    for fragment in fragments {
        for (key, value) in fragment {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

/// A project manifest held in memory between one read and one write.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectManifest {
    path: PathBuf,
    fields: Map<String, Value>,
}

impl ProjectManifest {
    /// Read `package.json` from `working_dir`. A missing file is an empty manifest.
    pub fn load(working_dir: &Path) -> ScaffoldResult<Self> {
        let path = working_dir.join(MANIFEST_FILE);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no manifest, starting empty");
            return Ok(Self::new(path, Map::new()));
        }

        let s = fs::read_to_string(&path).map_err(|e| ScaffoldError::io("read", &path, e))?;
        let value: Value = serde_json::from_str(&s).map_err(|e| ScaffoldError::Manifest {
            path: path.clone(),
            message: e.to_string(),
        })?;
        match value {
            Value::Object(fields) => Ok(Self::new(path, fields)),
            other => Err(ScaffoldError::Manifest {
                path,
                message: format!("expected a JSON object, found {}", kind(&other)),
            }),
        }
    }

    /// Wrap already-parsed fields.
    pub fn new(path: PathBuf, fields: Map<String, Value>) -> Self {
        Self { path, fields }
    }

    /// Where the manifest is persisted.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Top-level fields.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Whether `key` is a top-level field.
    pub fn has_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    /// Names in `dependencies` and `devDependencies` combined.
    pub fn dependency_set(&self) -> BTreeSet<String> {
        DEPENDENCY_KEYS
            .iter()
            .filter_map(|key| self.fields.get(*key).and_then(Value::as_object))
            .flat_map(|deps| deps.keys().cloned())
            .collect()
    }

    /// Add `resolved` to `devDependencies`; entries already there are kept.
    /// Returns how many names were new. A `devDependencies` that is not an
    /// object is left alone and reported.
    pub fn add_dev_dependencies(&mut self, resolved: &BTreeMap<String, String>) -> ScaffoldResult<usize> {
        let entry = self
            .fields
            .entry("devDependencies")
            .or_insert_with(|| Value::Object(Map::new()));
        let dev = match entry {
            Value::Object(dev) => dev,
            other => {
                return Err(ScaffoldError::Manifest {
                    path: self.path.clone(),
                    message: format!("devDependencies must be an object, found {}", kind(other)),
                });
            }
        };

        let mut added = 0;
        for (name, constraint) in resolved {
            if !dev.contains_key(name) {
                dev.insert(name.clone(), Value::String(constraint.clone()));
                added += 1;
            }
        }
        Ok(added)
    }

    /// Overwrite top-level keys with those of `fragment`.
    pub fn merge_top_level(&mut self, fragment: &Map<String, Value>) {
        for (key, value) in fragment {
            self.fields.insert(key.clone(), value.clone());
        }
    }

    /// Drop the registry-only identifier.
    pub fn strip_internal_id(&mut self) {
        self.fields.remove(INTERNAL_ID_KEY);
    }

    /// Write the manifest back, two-space indented with a trailing newline.
    pub fn write(&self) -> ScaffoldResult<()> {
        let mut fields = self.fields.clone();
        for key in SORTED_KEYS {
            if let Some(Value::Object(deps)) = fields.get_mut(key) {
                deps.sort_keys();
            }
        }

        let mut out = serde_json::to_string_pretty(&Value::Object(fields)).map_err(|e| {
            ScaffoldError::Manifest {
                path: self.path.clone(),
                message: e.to_string(),
            }
        })?;
        out.push('\n');
        fs::write(&self.path, out).map_err(|e| ScaffoldError::io("write", &self.path, e))?;
        tracing::info!(path = %self.path.display(), "manifest written");
        Ok(())
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
