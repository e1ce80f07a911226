//! Log retrieval error types.

use thiserror::Error;

/// Errors that can occur while retrieving or encoding logs.
///
/// Everything except [`LogError::Encode`] and [`LogError::InvalidRequest`]
/// is a "source unavailable" condition: the fallback chain records it as a
/// skip reason and moves on to the next source.
#[derive(Debug, Error)]
pub enum LogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("source not found: {0}")]
    NotFound(String),

    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("read window of {window} bytes held no complete line")]
    InsufficientWindow { window: u64 },

    #[error("command produced no output: {0}")]
    NoOutput(String),

    #[error("source is empty: {0}")]
    Empty(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("encoding failed: {0}")]
    Encode(String),
}

impl LogError {
    /// Map an I/O error on `path` to the matching variant.
    pub fn from_io(path: &str, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_string()),
            _ => Self::Io(format!("{path}: {e}")),
        }
    }
}

impl From<serde_json::Error> for LogError {
    fn from(e: serde_json::Error) -> Self {
        Self::Encode(e.to_string())
    }
}

/// Convenience alias for log retrieval results.
pub type LogResult<T> = Result<T, LogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_kinds_map_to_variants() {
        let nf = std::io::Error::from(std::io::ErrorKind::NotFound);
        assert!(matches!(LogError::from_io("/a", nf), LogError::NotFound(p) if p == "/a"));

        let pd = std::io::Error::from(std::io::ErrorKind::PermissionDenied);
        assert!(matches!(
            LogError::from_io("/b", pd),
            LogError::PermissionDenied(_)
        ));

        let other = std::io::Error::other("disk on fire");
        let err = LogError::from_io("/c", other);
        assert!(err.to_string().contains("/c: disk on fire"));
    }
}
