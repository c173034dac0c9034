//! Machine-parsable change report for the notification step.
//!
//! The block is printed on stdout between two sentinel lines, one change per
//! line: `name|old url|new url`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_BEGIN_MARKER: &str = "::relink-changes-begin::";
pub const DEFAULT_END_MARKER: &str = "::relink-changes-end::";
pub const DEFAULT_DELIMITER: &str = "|";

/// One provider whose URL was rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub key: String,
    pub name: String,
    pub old_url: String,
    pub new_url: String,
}

/// Sentinels and field delimiter (optional `[report]` section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportFormat {
    pub begin_marker: String,
    pub end_marker: String,
    pub delimiter: String,
}

impl Default for ReportFormat {
    fn default() -> Self {
        Self {
            begin_marker: DEFAULT_BEGIN_MARKER.to_string(),
            end_marker: DEFAULT_END_MARKER.to_string(),
            delimiter: DEFAULT_DELIMITER.to_string(),
        }
    }
}

/// Renders the full block, markers included. Always emitted, even with no changes.
pub fn render(changes: &[Change], format: &ReportFormat) -> String {
    let mut out = String::new();
    out.push_str(&format.begin_marker);
    out.push('\n');
    for change in changes {
        out.push_str(&render_line(change, format));
        out.push('\n');
    }
    out.push_str(&format.end_marker);
    out.push('\n');
    out
}

/// A single `name|old|new` line.
pub fn render_line(change: &Change, format: &ReportFormat) -> String {
    let name = single_line(&change.name);
    let name = if format.delimiter.is_empty() {
        name
    } else {
        name.replace(format.delimiter.as_str(), " ")
    };
    [
        name,
        single_line(&change.old_url),
        single_line(&change.new_url),
    ]
    .join(format.delimiter.as_str())
}

fn single_line(s: &str) -> String {
    s.replace(&['\r', '\n'][..], " ")
}
