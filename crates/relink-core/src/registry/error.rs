//! Errors loading or writing the registry. All of them abort a run.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read registry {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("registry {} is not valid JSON: {source}", path.display())]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("registry {} must be a JSON object of provider records", path.display())]
    NotAnObject { path: PathBuf },

    #[error("failed to serialize registry: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write registry {}: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
}
