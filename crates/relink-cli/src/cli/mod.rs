//! CLI for relink.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use relink_core::config::{self, RelinkConfig};
use relink_core::rewrite::PathPolicy;
use std::path::PathBuf;

use commands::{run_check, run_list, run_probe, run_rewrite};

/// Top-level CLI for relink.
#[derive(Debug, Parser)]
#[command(name = "relink")]
#[command(
    about = "relink: keep a provider registry's URLs current across domain migrations",
    long_about = None
)]
pub struct Cli {
    /// Log to ~/.local/state/relink/relink.log instead of stderr.
    #[arg(long, global = true)]
    pub log_file: bool,

    /// Config file to use instead of ~/.config/relink/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Probe every provider, rewrite migrated URLs and print the change report.
    Check {
        /// Registry JSON file (default from config, else providers.json).
        #[arg(long, value_name = "PATH")]
        registry: Option<PathBuf>,
        /// Path policy: "full-path" or "trailing-slash".
        #[arg(long, value_name = "POLICY")]
        policy: Option<PathPolicy>,
        /// Per-request timeout in seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Report changes without writing the registry.
        #[arg(long)]
        dry_run: bool,
    },

    /// Probe a single URL and show what `check` would do with it.
    Probe {
        /// URL to probe.
        url: String,
        /// Path policy: "full-path" or "trailing-slash".
        #[arg(long, value_name = "POLICY")]
        policy: Option<PathPolicy>,
        /// Per-request timeout in seconds.
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
    },

    /// Compute the rewritten URL for an original URL and a Location value.
    Rewrite {
        /// URL as stored in the registry.
        original: String,
        /// Redirect target (absolute or relative).
        location: String,
        /// Path policy: "full-path" or "trailing-slash".
        #[arg(long, value_name = "POLICY")]
        policy: Option<PathPolicy>,
    },

    /// List providers in the registry.
    List {
        /// Registry JSON file (default from config, else providers.json).
        #[arg(long, value_name = "PATH")]
        registry: Option<PathBuf>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let cfg = match &self.config {
            Some(path) => config::load_from(path)?,
            None => config::load_or_init()?,
        };
        tracing::debug!("loaded config: {:?}", cfg);

        match self.command {
            CliCommand::Check {
                registry,
                policy,
                timeout,
                dry_run,
            } => {
                let cfg = with_overrides(cfg, registry, policy, timeout);
                run_check(&cfg, dry_run).await?;
            }
            CliCommand::Probe {
                url,
                policy,
                timeout,
            } => {
                let cfg = with_overrides(cfg, None, policy, timeout);
                run_probe(&cfg, &url).await?;
            }
            CliCommand::Rewrite {
                original,
                location,
                policy,
            } => run_rewrite(&original, &location, policy.unwrap_or(cfg.path_policy))?,
            CliCommand::List { registry } => {
                let cfg = with_overrides(cfg, registry, None, None);
                run_list(&cfg)?;
            }
        }

        Ok(())
    }
}

/// CLI flags win over config values.
fn with_overrides(
    mut cfg: RelinkConfig,
    registry: Option<PathBuf>,
    policy: Option<PathPolicy>,
    timeout: Option<u64>,
) -> RelinkConfig {
    if let Some(path) = registry {
        cfg.registry_path = path;
    }
    if let Some(policy) = policy {
        cfg.path_policy = policy;
    }
    if let Some(secs) = timeout {
        cfg.timeout_secs = secs;
    }
    cfg
}

#[cfg(test)]
mod tests;
