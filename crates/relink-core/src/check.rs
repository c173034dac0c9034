//! One pass over the registry: probe each provider, rewrite migrated URLs,
//! write the file once if anything changed.

use std::path::Path;

use crate::probe::{Inconclusive, ProbeOutcome, Prober};
use crate::registry::{Registry, RegistryError};
use crate::report::Change;
use crate::rewrite::{migrated_url, PathPolicy};

#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions {
    pub policy: PathPolicy,
    /// Compute and report changes without writing the registry.
    pub dry_run: bool,
}

/// Tally of one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub checked: usize,
    pub valid: usize,
    /// Redirects whose target could be resolved (changed or not).
    pub redirected: usize,
    pub inconclusive: usize,
    /// Records that are not `{name, url}` objects; never probed.
    pub skipped: usize,
    pub changes: Vec<Change>,
    /// True if the registry file was rewritten.
    pub saved: bool,
}

/// Probes every provider in file order and applies rewrites in memory.
///
/// A failure on one provider is logged and never stops the others.
pub fn check_providers<P: Prober + ?Sized>(
    registry: &mut Registry,
    prober: &P,
    policy: PathPolicy,
) -> RunSummary {
    let mut summary = RunSummary::default();
    let records: Vec<(String, Result<(String, String), String>)> = registry
        .records()
        .map(|(key, parsed)| {
            let parsed = parsed
                .map(|p| (p.name.clone(), p.url.clone()))
                .map_err(str::to_string);
            (key.to_string(), parsed)
        })
        .collect();

    for (key, parsed) in records {
        let (name, url) = match parsed {
            Ok(fields) => fields,
            Err(reason) => {
                summary.skipped += 1;
                tracing::warn!("[invalid] record {:?} skipped: {}", key, reason);
                continue;
            }
        };
        tracing::info!("checking {} ({})", name, url);
        summary.checked += 1;

        match prober.probe(&url) {
            ProbeOutcome::Valid => {
                summary.valid += 1;
                tracing::info!("[valid] {} is valid (200 OK)", url);
            }
            ProbeOutcome::Redirect { status, location } => {
                match migrated_url(&url, &location, policy) {
                    Ok(None) => {
                        summary.redirected += 1;
                        tracing::info!("[redirect] {} redirects ({}) to {}", url, status, location);
                        tracing::info!("{} keeps its origin; no change", name);
                    }
                    Ok(Some(new_url)) => {
                        summary.redirected += 1;
                        tracing::info!("[redirect] {} redirects ({}) to {}", url, status, location);
                        registry.set_url(&key, new_url.clone());
                        tracing::info!("[updated] {} URL {} -> {}", name, url, new_url);
                        summary.changes.push(Change {
                            key,
                            name,
                            old_url: url,
                            new_url,
                        });
                    }
                    Err(e) => {
                        summary.inconclusive += 1;
                        tracing::warn!("[invalid] {} redirect to {:?} unusable: {}", url, location, e);
                    }
                }
            }
            ProbeOutcome::Inconclusive(reason) => {
                summary.inconclusive += 1;
                log_inconclusive(&url, &reason);
            }
        }
    }

    summary
}

fn log_inconclusive(url: &str, reason: &Inconclusive) {
    match reason {
        Inconclusive::Status(_) | Inconclusive::MissingLocation(_) => {
            tracing::warn!("[status] {} {}", url, reason)
        }
        Inconclusive::Timeout => tracing::warn!("[timeout] {} {}", url, reason),
        Inconclusive::Unreachable(_) => tracing::warn!("[unreachable] {} {}", url, reason),
        Inconclusive::InvalidUrl(_) => tracing::warn!("[invalid] {} {}", url, reason),
    }
}

/// Load → check → save if changed. Registry errors abort; provider errors do not.
pub fn run<P: Prober + ?Sized>(
    path: &Path,
    prober: &P,
    opts: &CheckOptions,
) -> Result<RunSummary, RegistryError> {
    let mut registry = Registry::load(path)?;
    tracing::info!(
        "loaded {} providers from {} (policy {})",
        registry.len(),
        path.display(),
        opts.policy
    );

    let mut summary = check_providers(&mut registry, prober, opts.policy);

    if summary.changes.is_empty() {
        tracing::info!("no changes needed for {}", path.display());
    } else if opts.dry_run {
        tracing::info!(
            "dry run: {} change(s) not written to {}",
            summary.changes.len(),
            path.display()
        );
    } else {
        registry.save()?;
        summary.saved = true;
        tracing::info!(
            "updated {} with {} new URL(s)",
            path.display(),
            summary.changes.len()
        );
    }

    Ok(summary)
}
