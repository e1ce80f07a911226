//! Line normalization: split raw lines into [`LogRecord`]s.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::tai64n;
use crate::types::LogRecord;

// journalctl --output short-iso, e.g. 2025-11-24T04:34:59+0000
static RE_ISO_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}(?:[.,][0-9]+)?(?:Z|[+-][0-9]{2}:?[0-9]{2})?)(?:\s|$)",
    )
    .unwrap()
});

/// How a source's lines carry their timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampStyle {
    /// Leading TAI64N label, decoded to ISO-8601.
    Tai64n,
    /// Leading ISO-8601 token, exposed as-is.
    IsoPrefix,
    /// TAI64N first, then ISO prefix.
    Auto,
    /// Never extract a timestamp.
    None,
}

/// Wrap one line into a record according to `style`.
///
/// A line that does not match the style is kept whole with no timestamp.
pub fn normalize_line(line: impl Into<String>, style: TimestampStyle) -> LogRecord {
    let line = line.into();
    match style {
        TimestampStyle::Tai64n => tai64n_record(line),
        TimestampStyle::IsoPrefix => iso_record(line),
        TimestampStyle::Auto => {
            if line.starts_with(tai64n::LABEL_PREFIX) {
                tai64n_record(line)
            } else {
                iso_record(line)
            }
        }
        TimestampStyle::None => LogRecord::untimed(line),
    }
}

/// Normalize a batch of lines, preserving order.
pub fn normalize_lines(lines: Vec<String>, style: TimestampStyle) -> Vec<LogRecord> {
    lines
        .into_iter()
        .map(|l| normalize_line(l, style))
        .collect()
}

fn tai64n_record(line: String) -> LogRecord {
    match tai64n::split_line(&line) {
        Some((token_len, dt)) => LogRecord::timed(line, token_len, tai64n::format_instant(&dt)),
        None => LogRecord::untimed(line),
    }
}

fn iso_record(line: String) -> LogRecord {
    let token = RE_ISO_PREFIX
        .captures(&line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());
    match token {
        Some(token) => LogRecord::timed(line, token.len(), token),
        None => LogRecord::untimed(line),
    }
}

/// Split a block of command or file output into non-blank lines.
///
/// Strips a trailing `\r` from CRLF endings; all other bytes are kept.
pub fn split_output(text: &str) -> Vec<String> {
    text.split('\n')
        .map(|l| l.strip_suffix('\r').unwrap_or(l))
        .filter(|l| !l.trim().is_empty())
        .map(String::from)
        .collect()
}
