//! Bounded execution of line-producing commands (journalctl, tail).
//!
//! Commands are only ever built from [`CommandSpec`] templates: a program,
//! a validated line count and configuration-supplied values checked at load
//! time. Execution goes through a [`CommandRunner`] so the native process
//! runner and the sandbox boundary are interchangeable.

use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tokio::process::Command;

use crate::error::{LogError, LogResult};
use crate::normalize::{TimestampStyle, split_output};

/// Default output cap for a single command (2 MB).
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 2 * 1024 * 1024;

/// Default subprocess timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Validate a systemd unit name: only alphanumeric, `.`, `@`, `-`, `_`.
pub fn is_valid_unit_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '@' | '-' | '_'))
}

/// Validate a log path for use as a command argument: absolute, and only
/// characters that need no quoting.
pub fn is_valid_log_path(path: &Path) -> bool {
    let Some(s) = path.to_str() else {
        return false;
    };
    path.is_absolute()
        && !s.contains("..")
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '.' | '-' | '_' | '@' | '+'))
}

// ── Templates ─────────────────────────────────────────────────

/// journalctl output formats the journal source understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JournalFormat {
    /// `2025-11-24T04:34:59+0000 host unit[pid]: message`
    #[default]
    ShortIso,
    /// Message text only.
    Cat,
}

impl JournalFormat {
    pub fn as_arg(&self) -> &'static str {
        match self {
            Self::ShortIso => "short-iso",
            Self::Cat => "cat",
        }
    }

    /// How timestamps appear in this format's lines.
    pub fn timestamp_style(&self) -> TimestampStyle {
        match self {
            Self::ShortIso => TimestampStyle::IsoPrefix,
            Self::Cat => TimestampStyle::None,
        }
    }
}

/// A fully-parameterized command built from a fixed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandSpec {
    /// `journalctl -u <unit> -n <lines> --no-pager --quiet --output <format>`
    Journal {
        unit: String,
        lines: usize,
        format: JournalFormat,
    },
    /// `tail -n <lines> <path>`
    Tail { path: String, lines: usize },
}

impl CommandSpec {
    pub fn journal(unit: &str, lines: usize, format: JournalFormat) -> LogResult<Self> {
        if !is_valid_unit_name(unit) {
            return Err(LogError::Config(format!("invalid unit name: {unit}")));
        }
        Ok(Self::Journal {
            unit: unit.to_string(),
            lines,
            format,
        })
    }

    pub fn tail(path: &Path, lines: usize) -> LogResult<Self> {
        if !is_valid_log_path(path) {
            return Err(LogError::Config(format!(
                "invalid log path: {}",
                path.display()
            )));
        }
        Ok(Self::Tail {
            path: path.display().to_string(),
            lines,
        })
    }

    pub fn program(&self) -> &'static str {
        match self {
            Self::Journal { .. } => "journalctl",
            Self::Tail { .. } => "tail",
        }
    }

    pub fn args(&self) -> Vec<String> {
        match self {
            Self::Journal {
                unit,
                lines,
                format,
            } => vec![
                "-u".into(),
                unit.clone(),
                "-n".into(),
                lines.to_string(),
                "--no-pager".into(),
                "--quiet".into(),
                "--output".into(),
                format.as_arg().into(),
            ],
            Self::Tail { path, lines } => vec!["-n".into(), lines.to_string(), path.clone()],
        }
    }

    /// Requested line count.
    pub fn lines(&self) -> usize {
        match self {
            Self::Journal { lines, .. } | Self::Tail { lines, .. } => *lines,
        }
    }

    /// Command line as a single string, quoted where needed.
    pub fn command_line(&self) -> String {
        let mut words = vec![self.program().to_string()];
        words.extend(self.args());
        shell_words::join(words)
    }
}

// ── Runners ───────────────────────────────────────────────────

/// Output and time bounds for one command execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecLimits {
    pub max_output_bytes: usize,
    pub timeout: Duration,
}

impl Default for ExecLimits {
    fn default() -> Self {
        Self {
            max_output_bytes: DEFAULT_MAX_OUTPUT_BYTES,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// Executes command templates.
///
/// Any failure (spawn error, non-zero exit, timeout, rejection) is reported
/// as empty output. Callers must not distinguish between them.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `spec`, returning at most `limits.max_output_bytes` of stdout.
    async fn run(&self, spec: &CommandSpec, limits: &ExecLimits) -> Vec<u8>;
}

/// Spawns commands directly, without a shell.
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec, limits: &ExecLimits) -> Vec<u8> {
        match capture(spec.program(), &spec.args(), limits).await {
            Ok(out) => out,
            Err(e) => {
                tracing::debug!(command = %spec.command_line(), error = %e, "command unavailable");
                Vec::new()
            }
        }
    }
}

/// Spawn `program` and collect up to `limits.max_output_bytes` of stdout.
///
/// The child is killed on drop, so timeouts and early returns never leave a
/// process behind. Output that reaches the cap is returned as-is even
/// though the child is killed before it exits.
pub(crate) async fn capture(
    program: &str,
    args: &[String],
    limits: &ExecLimits,
) -> LogResult<Vec<u8>> {
    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| LogError::NoOutput(format!("failed to run {program}: {e}")))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| LogError::Io(format!("{program}: stdout not captured")))?;

    let max = limits.max_output_bytes;
    let work = async {
        let mut buf = Vec::with_capacity(max);
        stdout
            .take(max as u64)
            .read_to_end(&mut buf)
            .await
            .map_err(|e| LogError::Io(format!("{program}: {e}")))?;

        if buf.len() >= max {
            let _ = child.start_kill();
            return Ok(buf);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| LogError::Io(format!("{program}: {e}")))?;
        if !status.success() {
            return Err(LogError::NoOutput(format!("{program} exited with {status}")));
        }
        Ok(buf)
    };

    match tokio::time::timeout(limits.timeout, work).await {
        Ok(result) => result,
        Err(_) => Err(LogError::NoOutput(format!(
            "{program} timed out after {}s",
            limits.timeout.as_secs()
        ))),
    }
}

// ── Bounded executor ──────────────────────────────────────────

/// Lines produced by one command run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLines {
    /// Non-blank lines in output order, at most the requested count.
    pub lines: Vec<String>,
    /// Output hit the byte cap; the last partial line was dropped.
    pub truncated: bool,
}

/// Runs templates under fixed limits and splits the output into lines.
#[derive(Clone)]
pub struct BoundedExecutor {
    runner: Arc<dyn CommandRunner>,
    limits: ExecLimits,
}

impl BoundedExecutor {
    pub fn new(runner: Arc<dyn CommandRunner>, limits: ExecLimits) -> Self {
        Self { runner, limits }
    }

    pub fn limits(&self) -> &ExecLimits {
        &self.limits
    }

    /// Run `spec`; empty output is an error so the caller can fall back.
    pub async fn run_lines(&self, spec: &CommandSpec) -> LogResult<CommandLines> {
        let mut bytes = self.runner.run(spec, &self.limits).await;
        if bytes.is_empty() {
            return Err(LogError::NoOutput(spec.command_line()));
        }
        bytes.truncate(self.limits.max_output_bytes);

        let truncated = bytes.len() >= self.limits.max_output_bytes;
        let mut text = String::from_utf8_lossy(&bytes).into_owned();
        if truncated && !text.ends_with('\n') {
            // Drop the partial last line
            match text.rfind('\n') {
                Some(pos) => text.truncate(pos),
                None => text.clear(),
            }
        }

        let mut lines = split_output(&text);
        let cap = spec.lines();
        if lines.len() > cap {
            lines.drain(..lines.len() - cap);
        }
        if lines.is_empty() {
            return Err(LogError::Empty(spec.command_line()));
        }
        Ok(CommandLines { lines, truncated })
    }
}
