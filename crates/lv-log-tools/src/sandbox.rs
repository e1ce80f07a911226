//! Sandbox execution boundary.
//!
//! Models the narrow foreign call a constrained runtime exposes to run host
//! commands: a command string in, bytes written into a caller-owned buffer,
//! a byte count out. Zero means "rejected or failed" and the two are never
//! distinguished. The boundary is a capability object: it only runs
//! allow-listed programs and refuses anything that looks like shell syntax.

use std::time::Duration;

use async_trait::async_trait;

use crate::command::{self, CommandRunner, CommandSpec, ExecLimits};
use crate::error::{LogError, LogResult};

/// Programs the boundary will run.
pub const DEFAULT_ALLOWED_PROGRAMS: &[&str] = &["journalctl", "tail"];

/// Shell metacharacters that indicate injection attempts.
const SHELL_METACHARACTERS: &[&str] = &[
    ";", "|", "`", "$(", "${", ">", "<", "&", "\n", "\r", "*", "?",
];

/// Sensitive paths that must not be read.
const SENSITIVE_PATHS: &[&str] = &[
    "/etc/shadow",
    "/etc/gshadow",
    "/etc/sudoers",
    "/.ssh",
    "/id_rsa",
    "/id_ed25519",
    ".env",
    "credentials",
    "secrets",
];

/// Allow-listed command execution with bounded output.
#[derive(Debug, Clone)]
pub struct SandboxBoundary {
    allowed: Vec<String>,
    timeout: Duration,
}

impl SandboxBoundary {
    pub fn new(timeout: Duration) -> Self {
        Self {
            allowed: DEFAULT_ALLOWED_PROGRAMS
                .iter()
                .map(|p| (*p).to_string())
                .collect(),
            timeout,
        }
    }

    /// Replace the program allow-list.
    pub fn with_allowed<I, S>(mut self, programs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = programs.into_iter().map(Into::into).collect();
        self
    }

    pub fn allowed_programs(&self) -> &[String] {
        &self.allowed
    }

    /// Check `command` against the boundary's rules and split it into words.
    pub fn admit(&self, command: &str) -> LogResult<Vec<String>> {
        let command = command.trim();
        if command.is_empty() {
            return Err(LogError::InvalidRequest("empty command".into()));
        }

        for meta in SHELL_METACHARACTERS {
            if command.contains(meta) {
                return Err(LogError::InvalidRequest(format!(
                    "shell metacharacter {meta:?} in command"
                )));
            }
        }

        let words = shell_words::split(command)
            .map_err(|e| LogError::InvalidRequest(format!("unparseable command: {e}")))?;
        let Some(program) = words.first() else {
            return Err(LogError::InvalidRequest("empty command".into()));
        };

        if !self.allowed.iter().any(|p| p == program) {
            return Err(LogError::InvalidRequest(format!(
                "command not allowed: {program}"
            )));
        }

        for arg in &words[1..] {
            if SENSITIVE_PATHS.iter().any(|s| arg.contains(s)) {
                return Err(LogError::InvalidRequest(format!(
                    "sensitive path blocked: {arg}"
                )));
            }
        }

        Ok(words)
    }

    /// Run `command`, writing at most `out.len()` bytes of its output.
    ///
    /// Returns the number of bytes written; zero on rejection or failure.
    pub async fn exec_command(&self, command: &str, out: &mut [u8]) -> usize {
        if out.is_empty() {
            return 0;
        }
        let words = match self.admit(command) {
            Ok(words) => words,
            Err(e) => {
                tracing::warn!(command, error = %e, "command rejected at sandbox boundary");
                return 0;
            }
        };

        let limits = ExecLimits {
            max_output_bytes: out.len(),
            timeout: self.timeout,
        };
        match command::capture(&words[0], &words[1..], &limits).await {
            Ok(bytes) => {
                let n = bytes.len().min(out.len());
                out[..n].copy_from_slice(&bytes[..n]);
                n
            }
            Err(e) => {
                tracing::debug!(command, error = %e, "sandboxed command failed");
                0
            }
        }
    }
}

#[async_trait]
impl CommandRunner for SandboxBoundary {
    async fn run(&self, spec: &CommandSpec, limits: &ExecLimits) -> Vec<u8> {
        // Output buffer is allocated up front at its full bound.
        let mut buf = vec![0u8; limits.max_output_bytes];
        let n = self.exec_command(&spec.command_line(), &mut buf).await;
        buf.truncate(n);
        buf
    }
}
