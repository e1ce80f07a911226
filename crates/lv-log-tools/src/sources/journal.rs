//! systemd journal via a bounded `journalctl` run.

use async_trait::async_trait;

use crate::command::{BoundedExecutor, CommandSpec, JournalFormat};
use crate::error::{LogError, LogResult};
use crate::normalize::normalize_lines;
use crate::source::LogSource;
use crate::types::{RetrievalResult, SourceId};

pub const DEFAULT_UNIT: &str = "signalk";

/// journalctl status lines such as `-- No entries --` or `-- Boot 3f2a… --`.
fn is_marker_line(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 6 && line.starts_with("-- ") && line.ends_with(" --")
}

pub struct JournalSource {
    unit: String,
    format: JournalFormat,
    executor: BoundedExecutor,
}

impl JournalSource {
    pub fn new(unit: impl Into<String>, format: JournalFormat, executor: BoundedExecutor) -> Self {
        Self {
            unit: unit.into(),
            format,
            executor,
        }
    }
}

#[async_trait]
impl LogSource for JournalSource {
    fn id(&self) -> SourceId {
        SourceId::Journal
    }

    async fn fetch(&self, count: usize) -> LogResult<RetrievalResult> {
        let spec = CommandSpec::journal(&self.unit, count, self.format)?;
        let mut out = self.executor.run_lines(&spec).await?;
        out.lines.retain(|l| !is_marker_line(l));
        if out.lines.is_empty() {
            return Err(LogError::Empty(spec.command_line()));
        }
        let records = normalize_lines(out.lines, self.format.timestamp_style());
        Ok(
            RetrievalResult::new(SourceId::Journal, spec.command_line(), records)
                .with_truncated(out.truncated),
        )
    }
}
