//! Core retrieval types: records, results and source identifiers.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

// ── Source Id ─────────────────────────────────────────────────

/// Which source produced a retrieval result.
///
/// Declaration order is the fallback priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceId {
    /// Vendor-specific raw append-only log (TAI64N-stamped).
    RawFile,
    /// systemd journal via `journalctl`.
    Journal,
    /// Plain log file from a list of well-known locations.
    File,
    /// Every source was empty or unavailable.
    None,
}

impl SourceId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RawFile => "raw-file",
            Self::Journal => "journal",
            Self::File => "file",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for SourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Log Record ────────────────────────────────────────────────

/// One retrieved line, split into timestamp and message.
///
/// The original line is never modified. `message` is a view into it that
/// starts after the timestamp token and its single delimiter, so
/// `token + delimiter + message == original` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    original: String,
    timestamp: Option<String>,
    token_len: usize,
    message_start: usize,
}

impl LogRecord {
    /// A record with no timestamp: `message` is the whole line.
    pub fn untimed(original: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            timestamp: None,
            token_len: 0,
            message_start: 0,
        }
    }

    /// A record whose first `token_len` bytes are a timestamp token.
    ///
    /// `timestamp` is either the decoded instant or the token itself. A
    /// single ASCII whitespace byte after the token is treated as the
    /// delimiter. Falls back to [`LogRecord::untimed`] if `token_len` does not
    /// land on a char boundary.
    pub fn timed(original: impl Into<String>, token_len: usize, timestamp: String) -> Self {
        let original = original.into();
        if token_len == 0 || !original.is_char_boundary(token_len) {
            return Self::untimed(original);
        }
        let message_start = match original.as_bytes().get(token_len) {
            Some(b) if b.is_ascii_whitespace() => token_len + 1,
            _ => token_len,
        };
        Self {
            original,
            timestamp: Some(timestamp),
            token_len,
            message_start,
        }
    }

    /// The verbatim source line.
    pub fn original(&self) -> &str {
        &self.original
    }

    /// Decoded timestamp, or the raw token when no decoding applies.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// The line after the timestamp token and delimiter.
    pub fn message(&self) -> &str {
        &self.original[self.message_start..]
    }

    /// The exact bytes the timestamp was read from.
    pub fn timestamp_token(&self) -> Option<&str> {
        self.timestamp
            .as_ref()
            .map(|_| &self.original[..self.token_len])
    }

    /// The delimiter between token and message (empty if none).
    pub fn delimiter(&self) -> &str {
        &self.original[self.token_len..self.message_start]
    }

    pub fn into_original(self) -> String {
        self.original
    }
}

impl Serialize for LogRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("LogRecord", 3)?;
        s.serialize_field("original", &self.original)?;
        s.serialize_field("timestamp", &self.timestamp)?;
        s.serialize_field("message", self.message())?;
        s.end()
    }
}

// ── Retrieval Result ──────────────────────────────────────────

/// Outcome of one source attempt.
#[derive(Debug, Clone, Serialize)]
pub struct RetrievalResult {
    /// Records, oldest first and newest last.
    pub lines: Vec<LogRecord>,
    /// Source that produced the lines.
    pub source: SourceId,
    /// Resolved path or command line, for diagnostics.
    pub path: String,
    /// Whether a byte or window budget cut the read short of the request.
    pub truncated: bool,
}

impl RetrievalResult {
    pub fn new(source: SourceId, path: impl Into<String>, lines: Vec<LogRecord>) -> Self {
        Self {
            lines,
            source,
            path: path.into(),
            truncated: false,
        }
    }

    /// The result of an exhausted fallback chain.
    pub fn none() -> Self {
        Self::new(SourceId::None, "", Vec::new())
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }
}

/// Why a source was skipped by the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attempt {
    pub source: SourceId,
    pub reason: String,
}
