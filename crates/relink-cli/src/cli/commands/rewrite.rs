//! `relink rewrite <original> <location>` – pure URL rewrite.

use anyhow::Result;
use relink_core::rewrite::{rewrite_url, PathPolicy};

pub fn run_rewrite(original: &str, location: &str, policy: PathPolicy) -> Result<()> {
    let new_url = rewrite_url(original, location, policy)?;
    println!("{new_url}");
    Ok(())
}
