//! Host-type heuristic: is this a Venus OS (Victron GX) appliance?
//!
//! The answer only picks the remediation text attached to an empty result.
//! It never changes which sources are tried.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Which independent signal identified the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSignal {
    /// Known device hostname and the vendor marker directory exists.
    Hostname,
    /// Vendor marker file exists.
    MarkerFile,
    /// Vendor version file carries a build stamp and the marker directory exists.
    VersionFile,
    /// Release file names the product.
    ReleaseFile,
}

/// Outcome of the heuristic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HostProfile {
    pub is_specialized_device: bool,
    /// Every signal that fired.
    pub signals: Vec<HostSignal>,
}

/// Length of the numeric build stamp line in the version file.
const BUILD_STAMP_LEN: usize = 14;

fn default_hostname_path() -> PathBuf {
    PathBuf::from("/proc/sys/kernel/hostname")
}

fn default_device_hostnames() -> Vec<String> {
    ["einstein", "cerbogx", "ccgx", "venusgx", "nanopi", "beaglebone"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_marker_dir() -> PathBuf {
    PathBuf::from("/opt/victronenergy")
}

fn default_marker_file() -> PathBuf {
    PathBuf::from("/etc/venus/machine")
}

fn default_version_file() -> PathBuf {
    PathBuf::from("/opt/victronenergy/version")
}

fn default_release_file() -> PathBuf {
    PathBuf::from("/etc/os-release")
}

fn default_release_token() -> String {
    "venus".to_string()
}

/// Where the heuristic looks. Defaults describe Venus OS.
#[derive(Debug, Clone, Deserialize)]
pub struct HostProbe {
    #[serde(default = "default_hostname_path")]
    pub hostname_path: PathBuf,
    #[serde(default = "default_device_hostnames")]
    pub device_hostnames: Vec<String>,
    #[serde(default = "default_marker_dir")]
    pub marker_dir: PathBuf,
    #[serde(default = "default_marker_file")]
    pub marker_file: PathBuf,
    #[serde(default = "default_version_file")]
    pub version_file: PathBuf,
    #[serde(default = "default_release_file")]
    pub release_file: PathBuf,
    /// Matched case-insensitively against the release file.
    #[serde(default = "default_release_token")]
    pub release_token: String,
}

impl Default for HostProbe {
    fn default() -> Self {
        Self {
            hostname_path: default_hostname_path(),
            device_hostnames: default_device_hostnames(),
            marker_dir: default_marker_dir(),
            marker_file: default_marker_file(),
            version_file: default_version_file(),
            release_file: default_release_file(),
            release_token: default_release_token(),
        }
    }
}

impl HostProbe {
    /// Probe every signal. I/O errors count as "signal absent".
    pub async fn detect(&self) -> HostProfile {
        let marker_dir = is_dir(&self.marker_dir).await;
        let mut signals = Vec::new();

        if marker_dir && self.hostname_matches().await {
            signals.push(HostSignal::Hostname);
        }
        if is_file(&self.marker_file).await {
            signals.push(HostSignal::MarkerFile);
        }
        if marker_dir && self.version_matches().await {
            signals.push(HostSignal::VersionFile);
        }
        if self.release_matches().await {
            signals.push(HostSignal::ReleaseFile);
        }

        let profile = HostProfile {
            is_specialized_device: !signals.is_empty(),
            signals,
        };
        tracing::debug!(
            specialized = profile.is_specialized_device,
            signals = ?profile.signals,
            "host profile detected"
        );
        profile
    }

    async fn hostname_matches(&self) -> bool {
        let Some(content) = read_text(&self.hostname_path).await else {
            return false;
        };
        let hostname = content.trim();
        self.device_hostnames
            .iter()
            .any(|h| h.eq_ignore_ascii_case(hostname))
    }

    async fn version_matches(&self) -> bool {
        let Some(content) = read_text(&self.version_file).await else {
            return false;
        };
        content.lines().map(str::trim).any(|line| {
            line.len() == BUILD_STAMP_LEN && line.bytes().all(|b| b.is_ascii_digit())
        })
    }

    async fn release_matches(&self) -> bool {
        if self.release_token.is_empty() {
            return false;
        }
        let Some(content) = read_text(&self.release_file).await else {
            return false;
        };
        content
            .to_ascii_lowercase()
            .contains(&self.release_token.to_ascii_lowercase())
    }
}

async fn read_text(path: &Path) -> Option<String> {
    tokio::fs::read_to_string(path).await.ok()
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
