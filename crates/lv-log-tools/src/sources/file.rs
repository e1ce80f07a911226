//! Plain log files at well-known locations.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::{LogError, LogResult};
use crate::normalize::{TimestampStyle, normalize_lines};
use crate::source::{LogSource, TailAccess};
use crate::types::{RetrievalResult, SourceId};

/// Plain log lines are usually shorter than raw vendor logs.
pub const DEFAULT_FILE_BYTES_PER_LINE: u64 = 256;

/// Candidate log files, in the order they are tried.
pub fn default_candidates() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Ok(home) = std::env::var("HOME") {
        let home = PathBuf::from(home);
        paths.push(home.join(".signalk/logs/signalk-server.log"));
        paths.push(home.join(".signalk/signalk-server.log"));
    }
    paths.extend(
        [
            "/var/log/signalk/signalk-server.log",
            "/var/log/signalk.log",
            "/var/log/syslog",
        ]
        .into_iter()
        .map(PathBuf::from),
    );
    paths
}

pub struct PlainFileSource {
    candidates: Vec<PathBuf>,
    access: TailAccess,
}

impl PlainFileSource {
    pub fn new(candidates: Vec<PathBuf>, access: TailAccess) -> Self {
        Self { candidates, access }
    }
}

#[async_trait]
impl LogSource for PlainFileSource {
    fn id(&self) -> SourceId {
        SourceId::File
    }

    /// Returns the tail of the first candidate that yields any lines.
    async fn fetch(&self, count: usize) -> LogResult<RetrievalResult> {
        let mut last_err = LogError::NotFound("no candidate log files configured".into());
        for path in &self.candidates {
            match self.access.tail(path, count).await {
                Ok(tail) => {
                    let records = normalize_lines(tail.lines, TimestampStyle::Auto);
                    return Ok(RetrievalResult::new(
                        SourceId::File,
                        path.display().to_string(),
                        records,
                    )
                    .with_truncated(tail.truncated));
                }
                Err(e) => {
                    tracing::debug!(path = %path.display(), error = %e, "log file candidate skipped");
                    last_err = e;
                }
            }
        }
        Err(last_err)
    }
}
