//! `relink check` – the full pass: probe, rewrite, save, report.

use anyhow::{Context, Result};
use relink_core::check::{self, CheckOptions};
use relink_core::config::RelinkConfig;
use relink_core::probe::CurlProber;
use relink_core::report;

pub async fn run_check(cfg: &RelinkConfig, dry_run: bool) -> Result<()> {
    let path = cfg.registry_path.clone();
    let options = CheckOptions {
        policy: cfg.path_policy,
        dry_run,
    };
    let prober = CurlProber::new(cfg.probe_options());

    // Probes are blocking curl calls, run one after another.
    let summary = tokio::task::spawn_blocking(move || check::run(&path, &prober, &options))
        .await
        .context("check task failed")?
        .with_context(|| format!("processing registry {}", cfg.registry_path.display()))?;

    tracing::info!(
        "checked {} providers: {} valid, {} redirected, {} inconclusive, {} changed, {} skipped",
        summary.checked,
        summary.valid,
        summary.redirected,
        summary.inconclusive,
        summary.changes.len(),
        summary.skipped
    );

    print!("{}", report::render(&summary.changes, &cfg.report_format()));
    Ok(())
}
