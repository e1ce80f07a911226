//! Mock sources and command runners for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::command::{CommandRunner, CommandSpec, ExecLimits};
use crate::error::{LogError, LogResult};
use crate::normalize::{TimestampStyle, normalize_lines};
use crate::source::LogSource;
use crate::types::{RetrievalResult, SourceId};

/// A source that serves pre-loaded lines and counts how often it is asked.
pub struct MockLogSource {
    id: SourceId,
    path: String,
    lines: Option<Vec<String>>,
    calls: Arc<AtomicUsize>,
}

impl MockLogSource {
    /// A source holding `lines`.
    pub fn with_lines(id: SourceId, path: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            id,
            path: path.into(),
            lines: Some(lines),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A source that exists but holds nothing.
    pub fn empty(id: SourceId) -> Self {
        Self::with_lines(id, "", Vec::new())
    }

    /// A source that fails every fetch.
    pub fn unavailable(id: SourceId) -> Self {
        Self {
            id,
            path: String::new(),
            lines: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Shared call counter, readable after the source is moved into a chain.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    /// Sample multilog output: one TAI64N line and two plain lines.
    pub fn with_raw_sample() -> Self {
        Self::with_lines(
            SourceId::RawFile,
            "/data/log/signalk-server/current",
            vec![
                "@4000000065a51e4b1a2b3c4d signalk-server running".into(),
                "plain engineering line one".into(),
                "plain engineering line two".into(),
            ],
        )
    }
}

#[async_trait]
impl LogSource for MockLogSource {
    fn id(&self) -> SourceId {
        self.id
    }

    async fn fetch(&self, count: usize) -> LogResult<RetrievalResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let lines = self
            .lines
            .as_ref()
            .ok_or_else(|| LogError::NotFound(format!("mock {} source", self.id)))?;
        let start = lines.len().saturating_sub(count);
        let style = match self.id {
            SourceId::RawFile => TimestampStyle::Tai64n,
            _ => TimestampStyle::Auto,
        };
        Ok(RetrievalResult::new(
            self.id,
            self.path.clone(),
            normalize_lines(lines[start..].to_vec(), style),
        ))
    }
}

/// A command runner that serves canned stdout per program.
///
/// Programs without canned output behave like a failed command: they
/// return zero bytes.
#[derive(Default)]
pub struct MockCommandRunner {
    outputs: HashMap<String, Vec<u8>>,
    calls: Mutex<Vec<String>>,
}

impl MockCommandRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `stdout` whenever `program` runs.
    pub fn with_output(mut self, program: &str, stdout: impl Into<Vec<u8>>) -> Self {
        self.outputs.insert(program.to_string(), stdout.into());
        self
    }

    /// Command lines run so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl CommandRunner for MockCommandRunner {
    async fn run(&self, spec: &CommandSpec, limits: &ExecLimits) -> Vec<u8> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(spec.command_line());
        }
        let mut out = self
            .outputs
            .get(spec.program())
            .cloned()
            .unwrap_or_default();
        out.truncate(limits.max_output_bytes);
        out
    }
}
