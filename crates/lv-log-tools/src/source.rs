//! Log source abstraction: one entry in the fallback chain.

use std::path::Path;

use async_trait::async_trait;

use crate::command::{BoundedExecutor, CommandSpec};
use crate::error::LogResult;
use crate::tail::{TailWindow, tail_file};
use crate::types::{RetrievalResult, SourceId};

/// A place logs can be fetched from.
///
/// Returns already-normalized records. An `Err` and an empty result mean
/// the same thing to the chain: "try the next source".
#[async_trait]
pub trait LogSource: Send + Sync {
    /// Identifier reported in responses.
    fn id(&self) -> SourceId;

    /// Fetch at most `count` of the most recent lines, newest last.
    async fn fetch(&self, count: usize) -> LogResult<RetrievalResult>;
}

/// How a file-backed source reaches its file.
#[derive(Clone)]
pub enum TailAccess {
    /// Seek + bounded read on the local filesystem.
    Direct(TailWindow),
    /// `tail -n` through a command runner (sandboxed runtimes).
    Command(BoundedExecutor),
}

/// Lines from the end of a file, plus whether the read was cut short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TailLines {
    pub lines: Vec<String>,
    pub truncated: bool,
}

impl TailAccess {
    pub async fn tail(&self, path: &Path, count: usize) -> LogResult<TailLines> {
        match self {
            Self::Direct(window) => {
                let read = tail_file(path, count, window).await?;
                Ok(TailLines {
                    lines: read.lines,
                    truncated: read.truncated,
                })
            }
            Self::Command(executor) => {
                let spec = CommandSpec::tail(path, count)?;
                let out = executor.run_lines(&spec).await?;
                Ok(TailLines {
                    lines: out.lines,
                    truncated: out.truncated,
                })
            }
        }
    }
}
