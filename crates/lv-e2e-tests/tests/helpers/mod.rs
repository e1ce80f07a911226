//! Shared test harness for E2E scenario tests.
//!
//! Lays out a fake host under a temp dir (raw log, plain log files, Venus OS
//! markers) and wires the real pipeline over it, with `journalctl`
//! answered by a `MockCommandRunner`.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use lv_api::routes::build_router;
use lv_api::state::AppState;
use lv_log_tools::{HostProbe, LogService, MockCommandRunner, ViewerConfig};

pub const TAI_LINE: &str = "@4000000065a51e4b1a2b3c4d signalk-server started";
pub const TAI_ISO: &str = "2024-01-15T12:00:01.000Z";

pub struct TestHarness {
    pub dir: TempDir,
    pub config: ViewerConfig,
    pub runner: Arc<MockCommandRunner>,
}

impl TestHarness {
    /// A host with nothing on it: no raw log, no files, journal fails.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let mut config = ViewerConfig::default();
        config.raw_file.path = root.join("data/log/signalk-server/current");
        config.file.paths = vec![
            root.join("home/.signalk/logs/signalk-server.log"),
            root.join("var/log/syslog"),
        ];
        config.host = HostProbe {
            hostname_path: root.join("proc/sys/kernel/hostname"),
            marker_dir: root.join("opt/victronenergy"),
            marker_file: root.join("etc/venus/machine"),
            version_file: root.join("opt/victronenergy/version"),
            release_file: root.join("etc/os-release"),
            ..HostProbe::default()
        };

        Self {
            dir,
            config,
            runner: Arc::new(MockCommandRunner::new()),
        }
    }

    /// Make `journalctl` print `stdout`.
    pub fn with_journal(mut self, stdout: &str) -> Self {
        self.runner = Arc::new(MockCommandRunner::new().with_output("journalctl", stdout));
        self
    }

    /// Serve canned output for `program` (sandboxed runs).
    pub fn with_command_output(mut self, program: &str, stdout: &str) -> Self {
        self.runner = Arc::new(MockCommandRunner::new().with_output(program, stdout));
        self
    }

    pub fn raw_path(&self) -> PathBuf {
        self.config.raw_file.path.clone()
    }

    pub fn syslog_path(&self) -> PathBuf {
        self.config.file.paths[1].clone()
    }

    pub fn write_raw(&self, lines: &[&str]) {
        write_lines(&self.raw_path(), lines);
    }

    pub fn write_syslog(&self, lines: &[&str]) {
        write_lines(&self.syslog_path(), lines);
    }

    /// Make the host look like a Venus OS device.
    pub fn mark_venus_device(&self) {
        write_lines(&self.config.host.marker_file, &["einstein"]);
    }

    pub fn service(&self) -> LogService {
        LogService::with_runner(self.config.clone(), self.runner.clone())
    }

    pub fn router(&self) -> Router {
        build_router(AppState::new(self.service()))
    }

    /// GET `uri` through the router and parse the JSON body.
    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = self
            .router()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }
}

fn write_lines(path: &std::path::Path, lines: &[&str]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut text = lines.join("\n");
    text.push('\n');
    std::fs::write(path, text).unwrap();
}
