use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

use httpmock::prelude::*;

const CATALOG: &str = r#"{
  "dataset": [
    {"title": "Tides", "modified": "2022-01-01T00:00:00", "keyword": ["ocean"]},
    {"title": "Trade", "modified": "2024-04-05"}
  ]
}"#;

fn bin() -> &'static str {
    env!("CARGO_BIN_EXE_metaview")
}

fn unique_temp_path(name: &str) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock should be after unix epoch")
        .as_nanos();
    std::env::temp_dir().join(format!("metaview-{name}-{stamp}.json"))
}

fn write_fixture(name: &str, contents: &str) -> PathBuf {
    let path = unique_temp_path(name);
    fs::write(&path, contents).expect("fixture should be written");
    path
}

#[test]
fn missing_command_prints_usage() {
    let output = Command::new(bin()).output().expect("metaview should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: metaview"));
}

#[test]
fn open_command_requires_a_path() {
    let output = Command::new(bin())
        .arg("open")
        .output()
        .expect("open should run");
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("usage: metaview open"));
}

#[test]
fn open_command_prints_notice_and_table() {
    let path = write_fixture("open", CATALOG);

    let output = Command::new(bin())
        .args(["open", path.to_string_lossy().as_ref()])
        .output()
        .expect("open should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let mut lines = stdout.lines();
    assert_eq!(lines.next(), Some("Catalog last updated on: April 05, 2024"));
    assert_eq!(lines.next(), Some("keyword\tmodified\ttitle"));
    assert_eq!(lines.next(), Some("[\"ocean\"]\t2022-01-01\tTides"));
    assert_eq!(lines.next(), Some("\t2024-04-05\tTrade"));

    let _ = fs::remove_file(path);
}

#[test]
fn open_command_emits_json_view() {
    let path = write_fixture("open-json", CATALOG);

    let output = Command::new(bin())
        .args(["open", path.to_string_lossy().as_ref(), "--json"])
        .output()
        .expect("open should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("open --json should emit json");
    assert_eq!(payload["dataset_count"], 2);
    assert_eq!(payload["summary_date"], "2024-04-05");
    assert_eq!(payload["rows"].as_array().map(Vec::len), Some(2));

    let _ = fs::remove_file(path);
}

#[test]
fn open_command_emits_csv() {
    let path = write_fixture("open-csv", CATALOG);

    let output = Command::new(bin())
        .args(["open", "--csv", path.to_string_lossy().as_ref()])
        .output()
        .expect("open should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("keyword,modified,title\n"));

    let _ = fs::remove_file(path);
}

#[test]
fn open_command_warns_on_empty_catalog_without_failing() {
    let path = write_fixture("empty", r#"{"dataset": []}"#);

    let output = Command::new(bin())
        .args(["open", path.to_string_lossy().as_ref()])
        .output()
        .expect("open should run");

    assert_eq!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No datasets found in the catalog."));
    assert!(output.stdout.is_empty());

    let _ = fs::remove_file(path);
}

#[test]
fn open_command_fails_on_malformed_file() {
    let path = write_fixture("malformed", "{\"dataset\": [");

    let output = Command::new(bin())
        .args(["open", path.to_string_lossy().as_ref()])
        .output()
        .expect("open should run");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load failed"));

    let _ = fs::remove_file(path);
}

#[test]
fn summary_command_reports_undated_catalog() {
    let path = write_fixture("undated", r#"{"dataset": [{"modified": "not-a-date"}]}"#);

    let output = Command::new(bin())
        .args(["summary", path.to_string_lossy().as_ref()])
        .output()
        .expect("summary should run");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "No 'modified' dates found in datasets.");

    let _ = fs::remove_file(path);
}

#[test]
fn fetch_command_loads_from_url() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/data.json");
        then.status(200).body(CATALOG);
    });

    let url = server.url("/data.json");
    let output = Command::new(bin())
        .args(["fetch", url.as_str(), "--json"])
        .output()
        .expect("fetch should run");

    assert_eq!(output.status.code(), Some(0));
    let payload: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("fetch --json should emit json");
    assert_eq!(payload["summary_display"], "April 05, 2024");
}

#[test]
fn invalid_configuration_is_a_usage_error() {
    let output = Command::new(bin())
        .args(["summary", "data.json"])
        .env("METAVIEW_TIMEOUT_SECS", "soon")
        .output()
        .expect("summary should run");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("METAVIEW_TIMEOUT_SECS"));
}
