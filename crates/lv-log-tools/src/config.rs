//! Retrieval configuration, loadable from TOML.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::command::{self, DEFAULT_MAX_OUTPUT_BYTES, ExecLimits, JournalFormat};
use crate::encode::{EscapePolicy, LinesMode};
use crate::error::{LogError, LogResult};
use crate::host::HostProbe;
use crate::request::LineLimits;
use crate::sources::file::{DEFAULT_FILE_BYTES_PER_LINE, default_candidates};
use crate::sources::journal::DEFAULT_UNIT;
use crate::sources::raw_file::{DEFAULT_RAW_BYTES_PER_LINE, DEFAULT_RAW_LOG_PATH};
use crate::tail::{DEFAULT_MAX_WINDOW_BYTES, TailWindow};

/// Where commands run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeMode {
    /// Direct file access and process spawning.
    #[default]
    Native,
    /// Everything goes through the sandbox boundary; files are read with `tail`.
    Sandboxed,
}

/// Top-level retrieval configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub runtime: RuntimeMode,
    #[serde(default)]
    pub lines: LineLimits,
    #[serde(default)]
    pub raw_file: RawFileConfig,
    #[serde(default)]
    pub journal: JournalConfig,
    #[serde(default)]
    pub file: FileConfig,
    #[serde(default)]
    pub commands: CommandConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub host: HostProbe,
}

fn default_true() -> bool {
    true
}

fn default_raw_path() -> PathBuf {
    PathBuf::from(DEFAULT_RAW_LOG_PATH)
}

fn default_raw_bytes_per_line() -> u64 {
    DEFAULT_RAW_BYTES_PER_LINE
}

fn default_file_bytes_per_line() -> u64 {
    DEFAULT_FILE_BYTES_PER_LINE
}

fn default_max_window() -> u64 {
    DEFAULT_MAX_WINDOW_BYTES
}

fn default_unit() -> String {
    DEFAULT_UNIT.to_string()
}

fn default_max_output() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

fn default_timeout_secs() -> u64 {
    command::DEFAULT_TIMEOUT.as_secs()
}

/// Vendor raw log (multilog `current`).
#[derive(Debug, Clone, Deserialize)]
pub struct RawFileConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_raw_path")]
    pub path: PathBuf,
    #[serde(default = "default_raw_bytes_per_line")]
    pub avg_bytes_per_line: u64,
    #[serde(default = "default_max_window")]
    pub max_window_bytes: u64,
}

impl Default for RawFileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: default_raw_path(),
            avg_bytes_per_line: default_raw_bytes_per_line(),
            max_window_bytes: default_max_window(),
        }
    }
}

impl RawFileConfig {
    pub fn window(&self) -> TailWindow {
        TailWindow {
            avg_bytes_per_line: self.avg_bytes_per_line,
            max_window_bytes: self.max_window_bytes,
        }
    }
}

/// systemd journal.
#[derive(Debug, Clone, Deserialize)]
pub struct JournalConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_unit")]
    pub unit: String,
    #[serde(default)]
    pub format: JournalFormat,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            unit: default_unit(),
            format: JournalFormat::default(),
        }
    }
}

/// Plain log files.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_candidates")]
    pub paths: Vec<PathBuf>,
    #[serde(default = "default_file_bytes_per_line")]
    pub avg_bytes_per_line: u64,
    #[serde(default = "default_max_window")]
    pub max_window_bytes: u64,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            paths: default_candidates(),
            avg_bytes_per_line: default_file_bytes_per_line(),
            max_window_bytes: default_max_window(),
        }
    }
}

impl FileConfig {
    pub fn window(&self) -> TailWindow {
        TailWindow {
            avg_bytes_per_line: self.avg_bytes_per_line,
            max_window_bytes: self.max_window_bytes,
        }
    }
}

/// Limits for every external command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    #[serde(default = "default_max_output")]
    pub max_output_bytes: usize,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            max_output_bytes: default_max_output(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl CommandConfig {
    pub fn limits(&self) -> ExecLimits {
        ExecLimits {
            max_output_bytes: self.max_output_bytes,
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

/// Response shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub lines_mode: LinesMode,
    #[serde(default)]
    pub escape: EscapePolicy,
}

impl ViewerConfig {
    /// Load config from a TOML file path and validate it.
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the pipeline cannot honour.
    pub fn validate(&self) -> LogResult<()> {
        self.lines.validate()?;

        if !command::is_valid_unit_name(&self.journal.unit) {
            return Err(LogError::Config(format!(
                "invalid journal unit: {}",
                self.journal.unit
            )));
        }
        for (name, window) in [("raw_file", self.raw_file.window()), ("file", self.file.window())] {
            if window.avg_bytes_per_line == 0 || window.max_window_bytes == 0 {
                return Err(LogError::Config(format!(
                    "{name}: window sizes must be positive"
                )));
            }
        }
        if self.commands.max_output_bytes == 0 || self.commands.timeout_secs == 0 {
            return Err(LogError::Config(
                "commands: output cap and timeout must be positive".into(),
            ));
        }
        if self.runtime == RuntimeMode::Sandboxed {
            let paths = std::iter::once(&self.raw_file.path).chain(&self.file.paths);
            for path in paths {
                if !command::is_valid_log_path(path) {
                    return Err(LogError::Config(format!(
                        "path cannot be passed to tail: {}",
                        path.display()
                    )));
                }
            }
        }
        if self.output.escape == EscapePolicy::Lossy {
            tracing::warn!("lossy escaping selected: control characters in log lines will be replaced with spaces");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_uses_defaults() {
        let config = ViewerConfig::from_toml("").unwrap();
        assert_eq!(config.runtime, RuntimeMode::Native);
        assert_eq!(config.lines.default_lines, 2000);
        assert_eq!(config.lines.max_lines, 10_000);
        assert_eq!(
            config.raw_file.path,
            PathBuf::from("/data/log/signalk-server/current")
        );
        assert_eq!(config.raw_file.avg_bytes_per_line, 500);
        assert_eq!(config.file.avg_bytes_per_line, 256);
        assert_eq!(config.journal.unit, "signalk");
        assert_eq!(config.journal.format, JournalFormat::ShortIso);
        assert_eq!(config.commands.timeout_secs, 5);
        assert_eq!(config.output.lines_mode, LinesMode::Structured);
        assert_eq!(config.output.escape, EscapePolicy::Lossless);
    }

    #[test]
    fn full_toml() {
        let toml = r#"
runtime = "sandboxed"

[lines]
default_lines = 500
min_lines = 10
max_lines = 50000

[raw_file]
enabled = false
path = "/data/log/custom/current"

[journal]
unit = "signalk.service"
format = "cat"

[file]
paths = ["/var/log/signalk.log"]
avg_bytes_per_line = 120

[commands]
max_output_bytes = 1048576
timeout_secs = 3

[output]
lines_mode = "plain"
escape = "lossless"

[host]
release_token = "venus"
"#;
        let config = ViewerConfig::from_toml(toml).unwrap();
        assert_eq!(config.runtime, RuntimeMode::Sandboxed);
        assert_eq!(config.lines.max_lines, 50_000);
        assert!(!config.raw_file.enabled);
        assert_eq!(config.journal.format, JournalFormat::Cat);
        assert_eq!(config.file.paths, vec![PathBuf::from("/var/log/signalk.log")]);
        assert_eq!(config.commands.limits().timeout, Duration::from_secs(3));
        assert_eq!(config.output.lines_mode, LinesMode::Plain);
        assert_eq!(config.host.marker_dir, PathBuf::from("/opt/victronenergy"));
    }

    #[test]
    fn invalid_unit_rejected() {
        let err = ViewerConfig::from_toml("[journal]\nunit = \"signalk; reboot\"").unwrap_err();
        assert!(err.to_string().contains("invalid journal unit"));
    }

    #[test]
    fn inverted_line_bounds_rejected() {
        let toml = "[lines]\nmin_lines = 100\nmax_lines = 10";
        assert!(ViewerConfig::from_toml(toml).is_err());
    }

    #[test]
    fn zero_window_rejected() {
        assert!(ViewerConfig::from_toml("[raw_file]\navg_bytes_per_line = 0").is_err());
    }

    #[test]
    fn sandboxed_paths_must_be_plain() {
        let toml = "runtime = \"sandboxed\"\n[file]\npaths = [\"/var/log/my log.txt\"]";
        assert!(ViewerConfig::from_toml(toml).is_err());
    }
}
