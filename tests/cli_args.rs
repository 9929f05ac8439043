//! Integration tests for the sponsors binary
//!
//! Covers argument handling and an end-to-end run against a local catalog server.

use chrono::{DateTime, Duration, Utc};
use httpmock::prelude::*;
use httpmock::Mock;
use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_sponsors"))
        .args(args)
        .env_remove("RUST_LOG")
        .env_remove("HTTP_PROXY")
        .env_remove("http_proxy")
        .env_remove("ALL_PROXY")
        .env_remove("all_proxy")
        .output()
        .expect("Failed to execute sponsors")
}

const CATALOG: &str = r#"{
    "gold-sponsors": [
        {"name": "Alpha", "url": "https://alpha.test", "banner": "/alpha.png", "logo": "/alpha-logo.png"},
        {"name": "Beta", "url": "https://beta.test", "banner": "/beta.png"},
        {"name": "Gamma", "url": "https://gamma.test", "banner": "/gamma.png", "logo": "/gamma-logo.png"}
    ],
    "silver-sponsors": [
        {"name": "A", "url": "https://a.test", "logo": "/a.png"},
        {"name": "B", "url": "https://b.test", "logo": "/b.png"},
        {"name": "C", "url": "https://c.test", "logo": "/c.png"},
        {"name": "D", "url": "https://d.test", "logo": "/d.png"}
    ]
}"#;

/// Registers the catalog at GET /sponsors.json
fn mock_catalog(server: &MockServer) -> Mock<'_> {
    server.mock(|when, then| {
        when.method(GET).path("/sponsors.json");
        then.status(200)
            .header("content-type", "application/json")
            .body(CATALOG);
    })
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sponsors"), "Help should mention sponsors");
    assert!(stdout.contains("--banner"), "Help should mention --banner flag");
    assert!(stdout.contains("--only-with-logo"));
}

#[test]
fn test_invalid_timestamp_prints_error_and_exits() {
    let output = run_cli(&["--no-cache", "--at", "not-a-time"]);
    assert!(!output.status.success(), "Expected invalid --at to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid") && stderr.contains("not-a-time"),
        "Should print error message about invalid timestamp: {}",
        stderr
    );
}

#[test]
fn test_conflicting_cache_flags_fail() {
    let output = run_cli(&["--no-cache", "--cache-dir", "/tmp/never-used"]);
    assert!(!output.status.success());
}

#[test]
fn test_unreachable_source_degrades_to_empty() {
    let output = run_cli(&[
        "--no-cache",
        "--url",
        "http://127.0.0.1:1/sponsors.json",
        "--at",
        "2024-03-15T01:10:00Z",
    ]);
    assert!(output.status.success(), "Fetch failures must not fail the run");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No sponsors in 'gold-sponsors'"), "got: {}", stdout);
}

#[test]
fn test_tier_rotation_end_to_end() {
    // (20240315 + 7) % 4 == 2
    let server = MockServer::start();
    mock_catalog(&server);
    let url = server.url("/sponsors.json");
    let output = run_cli(&[
        "--no-cache",
        "--url",
        &url,
        "--category",
        "silver-sponsors",
        "--at",
        "2024-03-15T01:10:00Z",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let order: Vec<&str> = stdout
        .lines()
        .filter_map(|line| line.split_whitespace().nth(1))
        .collect();
    assert_eq!(order, vec!["C", "D", "A", "B"]);
}

#[test]
fn test_banner_end_to_end() {
    // 20240315 % 3 == 2, (2 + 7) % 3 == 0
    let server = MockServer::start();
    mock_catalog(&server);
    let url = server.url("/sponsors.json");
    let output = run_cli(&[
        "--no-cache",
        "--url",
        &url,
        "--banner",
        "--at",
        "2024-03-15T01:10:00Z",
    ]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Alpha <https://alpha.test> banner=/alpha.png"), "got: {}", stdout);
}

#[test]
fn test_disk_cache_is_reused_between_runs() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let dir = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    let mock = mock_catalog(&server);
    let url = server.url("/sponsors.json");

    let first = run_cli(&["--cache-dir", &dir, "--url", &url, "--banner"]);
    assert!(first.status.success());
    assert!(temp_dir.path().join("sponsors-list.json").exists());

    let second = run_cli(&["--cache-dir", &dir, "--url", &url, "--banner"]);
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(!stdout.contains("No sponsor banner available"), "got: {}", stdout);

    mock.assert_hits(1);
}

#[test]
fn test_replay_instant_does_not_change_cache_expiry() {
    let temp_dir = tempfile::TempDir::new().expect("Failed to create temp directory");
    let dir = temp_dir.path().to_str().unwrap().to_string();
    let server = MockServer::start();
    let mock = mock_catalog(&server);
    let url = server.url("/sponsors.json");

    let before = Utc::now();
    let replay = run_cli(&[
        "--cache-dir",
        &dir,
        "--url",
        &url,
        "--banner",
        "--at",
        "2099-01-01T00:00:00Z",
    ]);
    let after = Utc::now();
    assert!(replay.status.success());

    let record = std::fs::read_to_string(temp_dir.path().join("sponsors-list.json"))
        .expect("Catalog should be cached");
    let record: serde_json::Value = serde_json::from_str(&record).unwrap();
    let until: DateTime<Utc> = record["until"]
        .as_str()
        .expect("Record should carry an expiry")
        .parse()
        .unwrap();
    assert!(until >= before + Duration::hours(1), "until {} too early", until);
    assert!(until <= after + Duration::hours(1), "until {} too late", until);

    // A normal run within the hour is served from the same record.
    let normal = run_cli(&["--cache-dir", &dir, "--url", &url, "--banner"]);
    assert!(normal.status.success());
    mock.assert_hits(1);
}
