//! HTTP probing of provider URLs.
//!
//! Uses the curl crate (libcurl) with redirect following disabled so the
//! redirect response itself is observed. HEAD first; one GET when HEAD fails at
//! the transport level or the origin rejects the method.

mod classify;

pub use classify::{classify_curl_error, classify_response, REDIRECT_STATUSES};

use std::fmt;
use std::time::Duration;

/// Default per-request bound.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// What a probe learned about a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// HTTP 200.
    Valid,
    /// 301/302/307/308 with a `Location` header (absolute or relative).
    Redirect { status: u32, location: String },
    /// Nothing actionable.
    Inconclusive(Inconclusive),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconclusive {
    /// Any status that is neither 200 nor a handled redirect.
    Status(u32),
    /// Redirect status without a usable `Location`.
    MissingLocation(u32),
    Timeout,
    /// DNS, connect, TLS or protocol failure.
    Unreachable(String),
    /// curl refused the URL itself.
    InvalidUrl(String),
}

impl fmt::Display for Inconclusive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Inconclusive::Status(code) => write!(f, "returned HTTP {}", code),
            Inconclusive::MissingLocation(code) => {
                write!(f, "returned HTTP {} without a Location header", code)
            }
            Inconclusive::Timeout => write!(f, "timed out"),
            Inconclusive::Unreachable(msg) => write!(f, "failed to respond: {}", msg),
            Inconclusive::InvalidUrl(msg) => write!(f, "invalid URL: {}", msg),
        }
    }
}

/// Something that can classify a URL. `CurlProber` talks to the network;
/// tests substitute scripted outcomes.
pub trait Prober {
    fn probe(&self, url: &str) -> ProbeOutcome;
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Bound on each HEAD or GET request (connect included).
    pub timeout: Duration,
    /// HEAD statuses that mean "method not supported here"; these get one GET.
    pub head_rejected_statuses: Vec<u32>,
    pub user_agent: Option<String>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            head_rejected_statuses: vec![405, 501],
            user_agent: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CurlProber {
    options: ProbeOptions,
}

impl CurlProber {
    pub fn new(options: ProbeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProbeOptions {
        &self.options
    }

    fn get_fallback(&self, url: &str) -> ProbeOutcome {
        match request(url, Method::Get, &self.options) {
            Ok(resp) => classify_response(resp.status, &resp.headers),
            Err(e) => ProbeOutcome::Inconclusive(classify_curl_error(&e)),
        }
    }
}

impl Prober for CurlProber {
    /// Runs in the current thread; call from `spawn_blocking` if used from async code.
    fn probe(&self, url: &str) -> ProbeOutcome {
        match request(url, Method::Head, &self.options) {
            Ok(resp) if self.options.head_rejected_statuses.contains(&resp.status) => {
                tracing::debug!("HEAD {} rejected with HTTP {}, retrying with GET", url, resp.status);
                self.get_fallback(url)
            }
            Ok(resp) => classify_response(resp.status, &resp.headers),
            Err(e) if e.is_url_malformed() || e.is_unsupported_protocol() => {
                ProbeOutcome::Inconclusive(classify_curl_error(&e))
            }
            Err(e) => {
                tracing::debug!("HEAD {} failed ({}), retrying with GET", url, e);
                self.get_fallback(url)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Method {
    Head,
    Get,
}

/// Status line and header lines of the final (only) response.
#[derive(Debug)]
struct RawResponse {
    status: u32,
    headers: Vec<String>,
}

fn request(url: &str, method: Method, opts: &ProbeOptions) -> Result<RawResponse, curl::Error> {
    let mut headers: Vec<String> = Vec::new();
    let mut body_started = false;

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    match method {
        Method::Head => easy.nobody(true)?,
        Method::Get => easy.get(true)?,
    }
    easy.follow_location(false)?;
    easy.connect_timeout(opts.timeout)?;
    easy.timeout(opts.timeout)?;
    if let Some(ua) = &opts.user_agent {
        easy.useragent(ua)?;
    }

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            // Non-UTF-8 bytes (e.g. in a Location) are replaced, not dropped.
            let raw = String::from_utf8_lossy(data);
            let line = raw.trim_end();
            // A new status line starts a new header block (e.g. after 100 Continue).
            if line.starts_with("HTTP/") {
                headers.clear();
            }
            headers.push(line.to_string());
            true
        })?;
        transfer.write_function(|_data| {
            // Headers are all we need; stop at the first body chunk.
            body_started = true;
            Ok(0)
        })?;
        transfer.perform()
    };

    match performed {
        Ok(()) => {}
        Err(e) if e.is_write_error() && body_started => {}
        Err(e) => return Err(e),
    }

    let status = easy.response_code()?;
    Ok(RawResponse { status, headers })
}
