//! Provider registry: a JSON object mapping stable keys to `{name, url}` records.
//!
//! Keys keep their file order. Each record is kept exactly as loaded and only
//! its `url` value is ever replaced. Records that are not `{name, url}`
//! objects are carried through untouched and never probed.

mod error;
mod persist;

pub use error::RegistryError;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// One named provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    pub name: String,
    pub url: String,
}

impl Provider {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    key: String,
    /// The record as loaded, field order included.
    record: Value,
    /// The `{name, url}` view, or why the record does not have one.
    parsed: Result<Provider, String>,
}

/// The registry loaded from one file.
#[derive(Debug, Clone)]
pub struct Registry {
    path: PathBuf,
    entries: Vec<Entry>,
    trailing_newline: bool,
}

impl Registry {
    /// Source file; `save` writes back here.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of records, usable or not.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every record in file order: the provider, or why the record is unusable.
    pub fn records(&self) -> impl Iterator<Item = (&str, Result<&Provider, &str>)> {
        self.entries
            .iter()
            .map(|e| (e.key.as_str(), e.parsed.as_ref().map_err(String::as_str)))
    }

    /// Usable providers in file order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Provider)> {
        self.records()
            .filter_map(|(key, parsed)| parsed.ok().map(|p| (key, p)))
    }

    pub fn get(&self, key: &str) -> Option<&Provider> {
        self.entry(key).and_then(|e| e.parsed.as_ref().ok())
    }

    /// Raw JSON of a record, exactly as it will be written.
    pub fn record(&self, key: &str) -> Option<&Value> {
        self.entry(key).map(|e| &e.record)
    }

    /// Replaces the URL of provider `key`, returning the previous one.
    /// Unusable records are never touched.
    pub fn set_url(&mut self, key: &str, url: impl Into<String>) -> Option<String> {
        let entry = self.entries.iter_mut().find(|e| e.key == key)?;
        let provider = entry.parsed.as_mut().ok()?;
        let url = url.into();
        if let Value::Object(fields) = &mut entry.record {
            fields.insert("url".to_string(), Value::String(url.clone()));
        }
        Some(std::mem::replace(&mut provider.url, url))
    }

    fn entry(&self, key: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.key == key)
    }

    fn from_parts(path: PathBuf, entries: Vec<Entry>, trailing_newline: bool) -> Self {
        Self {
            path,
            entries,
            trailing_newline,
        }
    }
}

#[cfg(test)]
mod tests;
