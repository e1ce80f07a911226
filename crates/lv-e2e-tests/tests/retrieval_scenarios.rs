//! E2E tests for source selection over HTTP:
//! GET /api/logs → fallback chain → normalizer → JSON body.

mod helpers;

use axum::http::StatusCode;

use helpers::{TAI_ISO, TAI_LINE, TestHarness};

/// Raw file with three lines, one TAI64N-stamped; two requested.
#[tokio::test]
async fn e2e_raw_file_tail_decodes_tai64n() {
    let h = TestHarness::new();
    h.write_raw(&["plain line one", "plain line two", TAI_LINE]);

    let (status, json) = h.get("/api/logs?lines=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "raw-file");
    assert_eq!(json["count"], 2);
    assert_eq!(json["truncated"], false);
    assert_eq!(json["path"], h.raw_path().display().to_string());

    let lines = json["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["original"], "plain line two");
    assert!(lines[0]["timestamp"].is_null());
    assert_eq!(lines[1]["original"], TAI_LINE);
    assert_eq!(lines[1]["timestamp"], TAI_ISO);
    assert_eq!(lines[1]["message"], "signalk-server started");
}

/// Raw file absent, journalctl fails, plain file has five lines.
#[tokio::test]
async fn e2e_falls_through_to_plain_file() {
    let h = TestHarness::new();
    h.write_syslog(&["s1", "s2", "s3", "s4", "s5"]);

    let (status, json) = h.get("/api/logs?lines=10").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "file");
    assert_eq!(json["count"], 5);
    assert_eq!(json["truncated"], false);
    assert_eq!(json["path"], h.syslog_path().display().to_string());
    assert_eq!(json["lines"][0]["original"], "s1");
    assert_eq!(json["lines"][4]["original"], "s5");
}

#[tokio::test]
async fn e2e_journal_used_when_raw_file_missing() {
    let h = TestHarness::new().with_journal(
        "2025-11-24T04:34:59+0000 venus signalk-server[812]: one\n\
         2025-11-24T04:35:00+0000 venus signalk-server[812]: two\n",
    );
    h.write_syslog(&["should not be read"]);

    let (status, json) = h.get("/api/logs?lines=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "journal");
    assert_eq!(json["count"], 2);
    assert!(json["path"].as_str().unwrap().starts_with("journalctl"));
    assert_eq!(json["lines"][1]["timestamp"], "2025-11-24T04:35:00+0000");
    assert_eq!(json["lines"][1]["message"], "venus signalk-server[812]: two");
}

/// A higher-priority source with lines means lower ones are never queried.
#[tokio::test]
async fn e2e_raw_file_wins_over_journal() {
    let h = TestHarness::new().with_journal("journal line\n");
    h.write_raw(&[TAI_LINE]);
    h.write_syslog(&["syslog line"]);

    let (status, json) = h.get("/api/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["source"], "raw-file");
    assert_eq!(json["count"], 1);
    assert!(h.runner.calls().is_empty(), "journalctl must not run");
}

/// An empty raw file is skipped like a missing one.
#[tokio::test]
async fn e2e_empty_raw_file_is_skipped() {
    let h = TestHarness::new();
    std::fs::create_dir_all(h.raw_path().parent().unwrap()).unwrap();
    std::fs::write(h.raw_path(), "").unwrap();
    h.write_syslog(&["only line"]);

    let (_, json) = h.get("/api/logs").await;
    assert_eq!(json["source"], "file");
    assert_eq!(json["count"], 1);
}

#[tokio::test]
async fn e2e_lines_param_is_clamped() {
    let mut h = TestHarness::new();
    h.config.lines.max_lines = 3;
    h.config.lines.default_lines = 2;
    h.write_syslog(&["a", "b", "c", "d", "e"]);

    let (_, json) = h.get("/api/logs?lines=500").await;
    assert_eq!(json["count"], 3);
    let (_, json) = h.get("/api/logs?lines=-4").await;
    assert_eq!(json["count"], 2);
    let (_, json) = h.get("/api/logs?lines=").await;
    assert_eq!(json["count"], 2);
}

/// Quotes, backslashes and control characters come back bit-exact.
#[tokio::test]
async fn e2e_escaping_round_trip() {
    let nasty = "q\"uote\" back\\slash tab\there bell\u{7} esc\u{1b} nul\u{0} unit\u{1f}";
    let h = TestHarness::new();
    h.write_raw(&[nasty]);

    let (status, json) = h.get("/api/logs").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["lines"][0]["original"], nasty);
    assert_eq!(json["lines"][0]["message"], nasty);
}
