//! Classify a raw response (status + header lines) or a curl failure.

use super::{Inconclusive, ProbeOutcome};

/// Statuses treated as a domain move when they carry a `Location`.
pub const REDIRECT_STATUSES: [u32; 4] = [301, 302, 307, 308];

/// Classify the status code and collected header lines of one response.
pub fn classify_response(status: u32, header_lines: &[String]) -> ProbeOutcome {
    match status {
        200 => ProbeOutcome::Valid,
        s if REDIRECT_STATUSES.contains(&s) => match header_value(header_lines, "location") {
            Some(location) if !location.is_empty() => ProbeOutcome::Redirect {
                status: s,
                location: location.to_string(),
            },
            _ => ProbeOutcome::Inconclusive(Inconclusive::MissingLocation(s)),
        },
        s => ProbeOutcome::Inconclusive(Inconclusive::Status(s)),
    }
}

/// Classify a transport-level curl failure.
pub fn classify_curl_error(e: &curl::Error) -> Inconclusive {
    if e.is_operation_timedout() {
        return Inconclusive::Timeout;
    }
    if e.is_url_malformed() || e.is_unsupported_protocol() {
        return Inconclusive::InvalidUrl(e.to_string());
    }
    Inconclusive::Unreachable(e.to_string())
}

/// Value of the last header named `name` (case-insensitive).
fn header_value<'a>(lines: &'a [String], name: &str) -> Option<&'a str> {
    lines
        .iter()
        .filter_map(|line| line.trim().split_once(':'))
        .filter(|(n, _)| n.trim().eq_ignore_ascii_case(name))
        .map(|(_, v)| v.trim())
        .last()
}
