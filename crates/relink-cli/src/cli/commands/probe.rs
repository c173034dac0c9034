//! `relink probe <url>` – classify one URL.

use anyhow::{Context, Result};
use relink_core::config::RelinkConfig;
use relink_core::probe::{CurlProber, ProbeOutcome, Prober};
use relink_core::rewrite::migrated_url;

pub async fn run_probe(cfg: &RelinkConfig, url: &str) -> Result<()> {
    let prober = CurlProber::new(cfg.probe_options());
    let target = url.to_string();
    let outcome = tokio::task::spawn_blocking(move || prober.probe(&target))
        .await
        .context("probe task failed")?;

    match outcome {
        ProbeOutcome::Valid => println!("valid: {url} (200 OK)"),
        ProbeOutcome::Redirect { status, location } => {
            println!("redirect: {url} -> {location} (HTTP {status})");
            match migrated_url(url, &location, cfg.path_policy) {
                Ok(None) => println!("unchanged: same origin"),
                Ok(Some(new_url)) => println!("rewrite ({}): {new_url}", cfg.path_policy),
                Err(e) => println!("unusable redirect: {e}"),
            }
        }
        ProbeOutcome::Inconclusive(reason) => println!("inconclusive: {url} {reason}"),
    }
    Ok(())
}
