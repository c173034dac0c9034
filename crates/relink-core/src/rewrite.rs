//! Redirect-driven URL rewriting.
//!
//! When a provider migrates domains, only the origin of the redirect target is
//! adopted. The path a client already depends on stays, because many origins
//! answer every request with a bare-domain redirect.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::{Position, Url};

/// Which part of the original URL survives a domain migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathPolicy {
    /// Keep the original path, query and fragment.
    #[default]
    FullPath,
    /// Keep only a trailing `/` if the original path had one.
    TrailingSlash,
}

impl PathPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            PathPolicy::FullPath => "full-path",
            PathPolicy::TrailingSlash => "trailing-slash",
        }
    }
}

impl fmt::Display for PathPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PathPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full-path" | "full" => Ok(PathPolicy::FullPath),
            "trailing-slash" | "slash" => Ok(PathPolicy::TrailingSlash),
            other => Err(format!(
                "unknown path policy {other:?} (expected \"full-path\" or \"trailing-slash\")"
            )),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("invalid original URL {url:?}: {source}")]
    InvalidOriginal {
        url: String,
        source: url::ParseError,
    },
    #[error("invalid redirect target {location:?}: {source}")]
    InvalidLocation {
        location: String,
        source: url::ParseError,
    },
    #[error("redirect target {0:?} has no network origin")]
    OpaqueOrigin(String),
}

/// Computes the URL a provider should move to after `original` redirected to `location`.
///
/// `location` may be absolute, scheme-relative (`//host/x`) or relative; relative
/// targets are resolved against the origin of `original`. The result is the
/// target's origin followed by the part of `original` that `policy` keeps.
///
/// # Examples
///
/// - `https://old.example/app/v2?x=1` + `https://new.example/irrelevant/path`
///   → `https://new.example/app/v2?x=1` (full-path)
/// - `https://old.example/watch/` + `https://new.example` → `https://new.example/watch/`
pub fn rewrite_url(
    original: &str,
    location: &str,
    policy: PathPolicy,
) -> Result<String, RewriteError> {
    let original = original.trim();
    let parsed = parse_original(original)?;
    let target = resolve_location(&parsed, location)?;
    splice(original, &parsed, &target, policy)
}

/// Like [`rewrite_url`], but `None` when the redirect stays on the original origin.
///
/// Origins are compared after parsing, so `https://a.example:443/x` redirecting
/// to `/login` is not a move even though the rewritten text would differ.
pub fn migrated_url(
    original: &str,
    location: &str,
    policy: PathPolicy,
) -> Result<Option<String>, RewriteError> {
    let original = original.trim();
    let parsed = parse_original(original)?;
    let target = resolve_location(&parsed, location)?;
    if target.origin() == parsed.origin() {
        return Ok(None);
    }
    splice(original, &parsed, &target, policy).map(Some)
}

fn parse_original(original: &str) -> Result<Url, RewriteError> {
    Url::parse(original).map_err(|source| RewriteError::InvalidOriginal {
        url: original.to_string(),
        source,
    })
}

/// Target origin + the part of `original` that `policy` keeps.
fn splice(
    original: &str,
    parsed: &Url,
    target: &Url,
    policy: PathPolicy,
) -> Result<String, RewriteError> {
    let origin = network_origin(target)?;
    let trailing = has_trailing_slash(original);

    let kept = match policy {
        PathPolicy::FullPath => {
            let tail = &parsed[Position::BeforePath..];
            if tail.is_empty() || tail == "/" {
                if trailing {
                    "/"
                } else {
                    ""
                }
            } else {
                tail
            }
        }
        PathPolicy::TrailingSlash => {
            if trailing {
                "/"
            } else {
                ""
            }
        }
    };

    Ok(format!("{origin}{kept}"))
}

/// Resolves a `Location` value to an absolute URL.
///
/// Targets without a scheme are joined onto the origin of `original`, not onto
/// its path.
pub fn resolve_location(original: &Url, location: &str) -> Result<Url, RewriteError> {
    let location = location.trim();
    match Url::parse(location) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let mut base = original.clone();
            base.set_path("/");
            base.set_query(None);
            base.set_fragment(None);
            base.join(location)
                .map_err(|source| RewriteError::InvalidLocation {
                    location: location.to_string(),
                    source,
                })
        }
        Err(source) => Err(RewriteError::InvalidLocation {
            location: location.to_string(),
            source,
        }),
    }
}

/// Scheme + host (+ non-default port), e.g. `https://new.example:8443`.
pub fn network_origin(url: &Url) -> Result<String, RewriteError> {
    let origin = url.origin();
    if !origin.is_tuple() {
        return Err(RewriteError::OpaqueOrigin(url.to_string()));
    }
    Ok(origin.ascii_serialization())
}

/// True if the path of the raw URL string (query and fragment ignored) ends with `/`.
///
/// Works on the raw text: the parser normalizes `https://a.example` to a `/` path,
/// which would hide whether the registry entry carried the slash.
fn has_trailing_slash(raw: &str) -> bool {
    raw.split(&['?', '#'][..])
        .next()
        .map(|path| path.ends_with('/'))
        .unwrap_or(false)
}
