//! Load from and atomically write back to the registry file.

use super::{Entry, Provider, Registry, RegistryError};
use serde_json::{Map, Value};
use std::fs;
use std::io::{self, Write};
use std::path::Path;

impl Registry {
    /// Reads and parses the registry at `path`.
    pub fn load(path: &Path) -> Result<Self, RegistryError> {
        let contents = fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                RegistryError::NotFound {
                    path: path.to_path_buf(),
                }
            } else {
                RegistryError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        Self::parse(path, &contents)
    }

    /// Parses registry text as if it had been read from `path`.
    ///
    /// Only an unparseable document or a non-object top level is an error; a
    /// record that is not a `{name, url}` object is kept but marked unusable.
    pub fn parse(path: &Path, contents: &str) -> Result<Self, RegistryError> {
        let doc: Value =
            serde_json::from_str(contents).map_err(|source| RegistryError::InvalidJson {
                path: path.to_path_buf(),
                source,
            })?;
        let Value::Object(records) = doc else {
            return Err(RegistryError::NotAnObject {
                path: path.to_path_buf(),
            });
        };

        let mut entries = Vec::with_capacity(records.len());
        for (key, record) in records {
            let parsed = serde_json::from_value::<Provider>(record.clone())
                .map_err(|e| e.to_string());
            entries.push(Entry {
                key,
                record,
                parsed,
            });
        }

        Ok(Registry::from_parts(
            path.to_path_buf(),
            entries,
            contents.ends_with('\n'),
        ))
    }

    /// Pretty JSON (two-space indent), keys in file order, no trailing newline.
    pub fn to_json_string(&self) -> Result<String, RegistryError> {
        let mut doc = Map::with_capacity(self.entries.len());
        for entry in &self.entries {
            doc.insert(entry.key.clone(), entry.record.clone());
        }
        Ok(serde_json::to_string_pretty(&Value::Object(doc))?)
    }

    /// Overwrites the source file.
    ///
    /// The new content goes to a temp file in the same directory which is then
    /// renamed over the original, so readers never see a half-written registry.
    pub fn save(&self) -> Result<(), RegistryError> {
        let mut json = self.to_json_string()?;
        if self.trailing_newline {
            json.push('\n');
        }

        let write_err = |source: io::Error| RegistryError::Write {
            path: self.path.clone(),
            source,
        };
        let dir = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_err)?;
        tmp.write_all(json.as_bytes()).map_err(write_err)?;
        tmp.as_file().sync_all().map_err(write_err)?;
        if let Ok(meta) = fs::metadata(&self.path) {
            // Temp files are created 0600; keep the registry's own mode.
            if let Err(e) = tmp.as_file().set_permissions(meta.permissions()) {
                tracing::debug!("could not copy permissions onto temp registry: {}", e);
            }
        }
        tmp.persist(&self.path).map_err(|e| write_err(e.error))?;
        Ok(())
    }
}
