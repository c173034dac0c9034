use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::probe::ProbeOptions;
use crate::report::ReportFormat;
use crate::rewrite::PathPolicy;

/// Registry file used when neither config nor CLI names one.
pub const DEFAULT_REGISTRY_PATH: &str = "providers.json";

/// Global configuration loaded from `~/.config/relink/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelinkConfig {
    /// Registry JSON file; relative paths resolve against the working directory.
    pub registry_path: PathBuf,
    /// Bound on each HEAD/GET request, in seconds.
    pub timeout_secs: u64,
    /// Which part of the original URL survives a redirect.
    pub path_policy: PathPolicy,
    /// HEAD statuses answered with one GET retry (origins that reject HEAD).
    pub head_rejected_statuses: Vec<u32>,
    /// Optional `User-Agent` header for probes.
    pub user_agent: Option<String>,
    /// Optional report markers/delimiter; if missing, built-in defaults are used.
    pub report: Option<ReportFormat>,
}

impl Default for RelinkConfig {
    fn default() -> Self {
        let probe = ProbeOptions::default();
        Self {
            registry_path: PathBuf::from(DEFAULT_REGISTRY_PATH),
            timeout_secs: probe.timeout.as_secs(),
            path_policy: PathPolicy::default(),
            head_rejected_statuses: probe.head_rejected_statuses,
            user_agent: None,
            report: None,
        }
    }
}

impl RelinkConfig {
    pub fn probe_options(&self) -> ProbeOptions {
        ProbeOptions {
            // A zero timeout would mean "no limit" to libcurl.
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
            head_rejected_statuses: self.head_rejected_statuses.clone(),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn report_format(&self) -> ReportFormat {
        self.report.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("relink")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RelinkConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RelinkConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file, which must exist.
pub fn load_from(path: &Path) -> Result<RelinkConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config file: {}", path.display()))?;
    let cfg: RelinkConfig = toml::from_str(&data)
        .with_context(|| format!("parse config file: {}", path.display()))?;
    Ok(cfg)
}
