//! Request-level pipeline: chain → encode, or host-aware "not found".

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;
use uuid::Uuid;

use crate::chain::FallbackChain;
use crate::command::{BoundedExecutor, CommandRunner, ProcessRunner};
use crate::config::{RuntimeMode, ViewerConfig};
use crate::encode::{LogsResponse, LogsUnavailable, encode_result};
use crate::host::{HostProbe, HostProfile};
use crate::request::LineLimits;
use crate::sandbox::SandboxBoundary;
use crate::source::TailAccess;
use crate::sources::{JournalSource, PlainFileSource, RawFileSource};

const NOT_FOUND_ERROR: &str = "Could not find logs";
const NOT_FOUND_MESSAGE: &str =
    "Tried the Venus OS raw log, journalctl and common log file locations";

const DEVICE_SUGGESTION: &str = "This looks like a Venus OS device. Check that the signalk-server \
     service is running and writing to /data/log/signalk-server/current, and that the server \
     user can read that file.";
const GENERIC_SUGGESTION: &str = "Check that Signal K is logging and accessible: run it as the \
     'signalk' systemd unit, or write its log to ~/.signalk/logs/signalk-server.log.";

/// Outcome of one `/api/logs` request.
#[derive(Debug, Clone)]
pub enum LogsOutcome {
    Found(LogsResponse),
    NotFound(LogsUnavailable),
}

/// Owns the read-only configuration and the source chain.
///
/// Shared across requests behind an `Arc`; each request builds its own
/// records, so nothing mutable is shared.
pub struct LogService {
    config: ViewerConfig,
    chain: FallbackChain,
}

impl LogService {
    /// Build the standard chain for `config`, picking the command runner
    /// from the runtime mode.
    pub fn from_config(config: ViewerConfig) -> Self {
        let runner: Arc<dyn CommandRunner> = match config.runtime {
            RuntimeMode::Native => Arc::new(ProcessRunner),
            RuntimeMode::Sandboxed => Arc::new(SandboxBoundary::new(Duration::from_secs(
                config.commands.timeout_secs,
            ))),
        };
        Self::with_runner(config, runner)
    }

    /// Build the standard chain with an explicit command runner.
    pub fn with_runner(config: ViewerConfig, runner: Arc<dyn CommandRunner>) -> Self {
        let chain = build_chain(&config, runner);
        Self { config, chain }
    }

    /// Use a hand-built chain (tests, custom hosts).
    pub fn with_chain(config: ViewerConfig, chain: FallbackChain) -> Self {
        Self { config, chain }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn limits(&self) -> &LineLimits {
        &self.config.lines
    }

    pub fn host_probe(&self) -> &HostProbe {
        &self.config.host
    }

    /// Fetch up to `count` lines (clamped to the configured bounds).
    pub async fn get_logs(&self, count: usize) -> LogsOutcome {
        let count = self.config.lines.clamp(count as u64);
        let request_id = Uuid::now_v7();
        let span = tracing::info_span!("get_logs", %request_id, count);

        async {
            let outcome = self.chain.retrieve(count).await;
            if !outcome.is_exhausted() {
                return LogsOutcome::Found(encode_result(
                    outcome.result,
                    self.config.output.lines_mode,
                    self.config.output.escape,
                ));
            }

            let host = self.config.host.detect().await;
            tracing::warn!(
                specialized = host.is_specialized_device,
                "could not find logs anywhere"
            );
            LogsOutcome::NotFound(LogsUnavailable {
                error: NOT_FOUND_ERROR.into(),
                message: NOT_FOUND_MESSAGE.into(),
                suggestion: suggestion_for(&host).into(),
                host,
                attempts: outcome.attempts,
            })
        }
        .instrument(span)
        .await
    }
}

/// Remediation text for an empty result on `host`.
pub fn suggestion_for(host: &HostProfile) -> &'static str {
    if host.is_specialized_device {
        DEVICE_SUGGESTION
    } else {
        GENERIC_SUGGESTION
    }
}

fn build_chain(config: &ViewerConfig, runner: Arc<dyn CommandRunner>) -> FallbackChain {
    let executor = BoundedExecutor::new(runner, config.commands.limits());
    let access = |window| match config.runtime {
        RuntimeMode::Native => TailAccess::Direct(window),
        RuntimeMode::Sandboxed => TailAccess::Command(executor.clone()),
    };

    let mut chain = FallbackChain::new();
    if config.raw_file.enabled {
        chain = chain.with_source(RawFileSource::new(
            config.raw_file.path.clone(),
            access(config.raw_file.window()),
        ));
    }
    if config.journal.enabled {
        chain = chain.with_source(JournalSource::new(
            config.journal.unit.clone(),
            config.journal.format,
            executor.clone(),
        ));
    }
    if config.file.enabled {
        chain = chain.with_source(PlainFileSource::new(
            config.file.paths.clone(),
            access(config.file.window()),
        ));
    }
    chain
}
