//! Typed request decoding and line-count clamping.

use serde::Deserialize;

use crate::error::{LogError, LogResult};

fn default_lines() -> usize {
    2000
}

fn default_min_lines() -> usize {
    1
}

fn default_max_lines() -> usize {
    10_000
}

/// Bounds on the requested line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LineLimits {
    /// Used when the request has no usable count.
    #[serde(default = "default_lines")]
    pub default_lines: usize,
    #[serde(default = "default_min_lines")]
    pub min_lines: usize,
    #[serde(default = "default_max_lines")]
    pub max_lines: usize,
}

impl Default for LineLimits {
    fn default() -> Self {
        Self {
            default_lines: default_lines(),
            min_lines: default_min_lines(),
            max_lines: default_max_lines(),
        }
    }
}

impl LineLimits {
    pub fn validate(&self) -> LogResult<()> {
        if self.min_lines == 0 || self.min_lines > self.max_lines {
            return Err(LogError::Config(format!(
                "lines: need 1 <= min_lines ({}) <= max_lines ({})",
                self.min_lines, self.max_lines
            )));
        }
        if !(self.min_lines..=self.max_lines).contains(&self.default_lines) {
            return Err(LogError::Config(format!(
                "lines: default_lines ({}) outside [{}, {}]",
                self.default_lines, self.min_lines, self.max_lines
            )));
        }
        Ok(())
    }

    /// Clamp a positive count into `[min_lines, max_lines]`.
    pub fn clamp(&self, n: u64) -> usize {
        let n = usize::try_from(n).unwrap_or(usize::MAX);
        n.clamp(self.min_lines, self.max_lines)
    }

    /// Resolve a query-string value.
    ///
    /// Missing, empty, zero, negative or non-numeric values fall back to
    /// `default_lines`; everything else is clamped.
    pub fn resolve(&self, raw: Option<&str>) -> usize {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
            return self.default_lines;
        };
        match raw.parse::<i128>() {
            Ok(n) if n > 0 => self.clamp(u64::try_from(n).unwrap_or(u64::MAX)),
            _ => self.default_lines,
        }
    }
}

/// The `lines` field as it may arrive: a JSON number or a string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LinesValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl LinesValue {
    pub fn resolve(&self, limits: &LineLimits) -> usize {
        match self {
            Self::Integer(n) if *n > 0 => limits.clamp(*n as u64),
            Self::Float(f) if f.is_finite() && *f >= 1.0 => limits.clamp(f.trunc() as u64),
            Self::Text(s) => limits.resolve(Some(s)),
            _ => limits.default_lines,
        }
    }
}

/// Query parameters carried in a sandboxed request envelope.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RequestQuery {
    #[serde(default)]
    pub lines: Option<LinesValue>,
}

/// Request envelope handed to a sandboxed handler.
///
/// Accepts `{"query": {"lines": ...}}` and a bare `{"lines": ...}`. Unknown
/// fields (method, path, headers) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogsRequest {
    #[serde(default)]
    pub query: RequestQuery,
    #[serde(default)]
    pub lines: Option<LinesValue>,
}

impl LogsRequest {
    /// Decode an envelope; malformed JSON is a validation error.
    pub fn from_json(text: &str) -> LogResult<Self> {
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_json::from_str(text)
            .map_err(|e| LogError::InvalidRequest(format!("malformed request: {e}")))
    }

    /// Line count to fetch under `limits`.
    pub fn line_count(&self, limits: &LineLimits) -> usize {
        self.query
            .lines
            .as_ref()
            .or(self.lines.as_ref())
            .map(|v| v.resolve(limits))
            .unwrap_or(limits.default_lines)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits() -> LineLimits {
        LineLimits {
            default_lines: 2000,
            min_lines: 1,
            max_lines: 10_000,
        }
    }

    #[test]
    fn query_string_resolution() {
        let l = limits();
        assert_eq!(l.resolve(None), 2000);
        assert_eq!(l.resolve(Some("")), 2000);
        assert_eq!(l.resolve(Some("abc")), 2000);
        assert_eq!(l.resolve(Some("0")), 2000);
        assert_eq!(l.resolve(Some("-5")), 2000);
        assert_eq!(l.resolve(Some("12abc")), 2000);
        assert_eq!(l.resolve(Some(" 250 ")), 250);
        assert_eq!(l.resolve(Some("50000")), 10_000);
        assert_eq!(l.resolve(Some("99999999999999999999999")), 10_000);
    }

    #[test]
    fn clamps_to_min() {
        let l = LineLimits {
            default_lines: 200,
            min_lines: 100,
            max_lines: 1000,
        };
        assert_eq!(l.resolve(Some("5")), 100);
    }

    #[test]
    fn limits_validation() {
        assert!(limits().validate().is_ok());
        let bad = LineLimits {
            default_lines: 5,
            min_lines: 10,
            max_lines: 100,
        };
        assert!(bad.validate().is_err());
        let zero = LineLimits {
            default_lines: 1,
            min_lines: 0,
            max_lines: 100,
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn envelope_with_query_number() {
        let req = LogsRequest::from_json(r#"{"method":"GET","query":{"lines":300}}"#).unwrap();
        assert_eq!(req.line_count(&limits()), 300);
    }

    #[test]
    fn envelope_with_string_and_float() {
        let req = LogsRequest::from_json(r#"{"query":{"lines":"42"}}"#).unwrap();
        assert_eq!(req.line_count(&limits()), 42);
        let req = LogsRequest::from_json(r#"{"lines": 12.9}"#).unwrap();
        assert_eq!(req.line_count(&limits()), 12);
    }

    #[test]
    fn envelope_without_lines_uses_default() {
        let req = LogsRequest::from_json(r#"{"query":{}}"#).unwrap();
        assert_eq!(req.line_count(&limits()), 2000);
        let req = LogsRequest::from_json("").unwrap();
        assert_eq!(req.line_count(&limits()), 2000);
        let req = LogsRequest::from_json(r#"{"query":{"lines":null}}"#).unwrap();
        assert_eq!(req.line_count(&limits()), 2000);
    }

    #[test]
    fn malformed_envelope_is_rejected() {
        let err = LogsRequest::from_json(r#"{"query": {"lines": 5"#).unwrap_err();
        assert!(matches!(err, LogError::InvalidRequest(_)));
    }
}
