//! Response payloads and their JSON encoding.
//!
//! String escaping is done by `serde_json`, which is lossless: quotes,
//! backslashes and every control character 0x00–0x1F survive a round trip
//! (`\n`, `\r`, `\t`, `\b`, `\f`, otherwise `\u00XX`). A lossy policy that
//! replaces control characters with spaces exists only for hosts that
//! cannot handle escapes, and must be selected explicitly.

use serde::{Deserialize, Serialize};

use crate::error::LogResult;
use crate::host::HostProfile;
use crate::types::{Attempt, LogRecord, RetrievalResult, SourceId};

/// Shape of each entry in `lines`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinesMode {
    /// `{original, timestamp, message}` objects.
    #[default]
    Structured,
    /// The original line as a string.
    Plain,
}

/// How control characters inside lines are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscapePolicy {
    /// Escape everything; the original text is recoverable bit-for-bit.
    #[default]
    Lossless,
    /// Replace each control character with a space before encoding.
    Lossy,
}

/// Replace every control character (0x00–0x1F) with a space.
///
/// Each replaced char is one byte before and after, so byte offsets into
/// the string stay valid.
pub fn scrub_controls(s: &str) -> String {
    s.chars()
        .map(|c| if (c as u32) < 0x20 { ' ' } else { c })
        .collect()
}

/// Entries of a successful response.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum EncodedLines {
    Structured(Vec<LogRecord>),
    Plain(Vec<String>),
}

impl EncodedLines {
    pub fn len(&self) -> usize {
        match self {
            Self::Structured(v) => v.len(),
            Self::Plain(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Body of a successful `/api/logs` response.
#[derive(Debug, Clone, Serialize)]
pub struct LogsResponse {
    pub lines: EncodedLines,
    pub count: usize,
    pub source: SourceId,
    pub path: String,
    pub truncated: bool,
}

/// Body of a 404 when no source had lines.
#[derive(Debug, Clone, Serialize)]
pub struct LogsUnavailable {
    pub error: String,
    pub message: String,
    pub suggestion: String,
    pub host: HostProfile,
    pub attempts: Vec<Attempt>,
}

/// Turn a retrieval result into a response body.
///
/// Order is preserved; `count` always equals the number of entries.
pub fn encode_result(result: RetrievalResult, mode: LinesMode, policy: EscapePolicy) -> LogsResponse {
    let records = match policy {
        EscapePolicy::Lossless => result.lines,
        EscapePolicy::Lossy => result.lines.into_iter().map(scrub_record).collect(),
    };
    let lines = match mode {
        LinesMode::Structured => EncodedLines::Structured(records),
        LinesMode::Plain => {
            EncodedLines::Plain(records.into_iter().map(LogRecord::into_original).collect())
        }
    };
    LogsResponse {
        count: lines.len(),
        lines,
        source: result.source,
        path: result.path,
        truncated: result.truncated,
    }
}

fn scrub_record(record: LogRecord) -> LogRecord {
    let original = scrub_controls(record.original());
    match (record.timestamp(), record.timestamp_token()) {
        (Some(ts), Some(token)) => LogRecord::timed(original, token.len(), scrub_controls(ts)),
        _ => LogRecord::untimed(original),
    }
}

/// Serialize a payload to JSON text.
pub fn to_json<T: Serialize>(value: &T) -> LogResult<String> {
    Ok(serde_json::to_string(value)?)
}
