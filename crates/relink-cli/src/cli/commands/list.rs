//! `relink list` – show providers in registry order.

use anyhow::{Context, Result};
use relink_core::config::RelinkConfig;
use relink_core::registry::Registry;

pub fn run_list(cfg: &RelinkConfig) -> Result<()> {
    let registry = Registry::load(&cfg.registry_path)
        .with_context(|| format!("loading registry {}", cfg.registry_path.display()))?;
    if registry.is_empty() {
        println!("No providers in {}.", cfg.registry_path.display());
        return Ok(());
    }
    println!("{:<16} {:<24} {}", "KEY", "NAME", "URL");
    for (key, parsed) in registry.records() {
        match parsed {
            Ok(provider) => println!("{:<16} {:<24} {}", key, provider.name, provider.url),
            Err(reason) => println!("{:<16} {:<24} {}", key, "(invalid record)", reason),
        }
    }
    Ok(())
}
