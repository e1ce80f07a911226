//! Vendor raw log: multilog `current` file with TAI64N-stamped lines.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::LogResult;
use crate::normalize::{TimestampStyle, normalize_lines};
use crate::source::{LogSource, TailAccess};
use crate::types::{RetrievalResult, SourceId};

/// Default raw log location on Venus OS devices.
pub const DEFAULT_RAW_LOG_PATH: &str = "/data/log/signalk-server/current";

/// Raw log lines are verbose (stack traces, JSON deltas).
pub const DEFAULT_RAW_BYTES_PER_LINE: u64 = 500;

pub struct RawFileSource {
    path: PathBuf,
    access: TailAccess,
}

impl RawFileSource {
    pub fn new(path: impl Into<PathBuf>, access: TailAccess) -> Self {
        Self {
            path: path.into(),
            access,
        }
    }
}

#[async_trait]
impl LogSource for RawFileSource {
    fn id(&self) -> SourceId {
        SourceId::RawFile
    }

    async fn fetch(&self, count: usize) -> LogResult<RetrievalResult> {
        let tail = self.access.tail(&self.path, count).await?;
        let records = normalize_lines(tail.lines, TimestampStyle::Tai64n);
        Ok(
            RetrievalResult::new(SourceId::RawFile, self.path.display().to_string(), records)
                .with_truncated(tail.truncated),
        )
    }
}
