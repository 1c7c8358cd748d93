//! Integration tests for the timeline command.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Test that the timeline command is correctly registered.
#[test]
fn test_timeline_command_registered() {
    let mdt_binary = env!("CARGO_BIN_EXE_mdt");

    let output = Command::new(mdt_binary)
        .arg("--help")
        .output()
        .expect("Failed to run mdt --help");

    assert!(output.status.success());
    let help_text = String::from_utf8_lossy(&output.stdout);
    assert!(
        help_text.contains("timeline"),
        "Expected 'timeline' in help output: {help_text}"
    );
}

/// Test that timeline --help shows the window and machine flags.
#[test]
fn test_timeline_help_content() {
    let mdt_binary = env!("CARGO_BIN_EXE_mdt");

    let output = Command::new(mdt_binary)
        .arg("timeline")
        .arg("--help")
        .output()
        .expect("Failed to run mdt timeline --help");

    assert!(output.status.success());
    let help_text = String::from_utf8_lossy(&output.stdout);

    assert!(
        help_text.contains("Export a device's event timeline"),
        "Expected description: {help_text}"
    );
    for flag in ["--from", "--to", "--machine"] {
        assert!(help_text.contains(flag), "Expected {flag}: {help_text}");
    }
}

/// Test that the machine identifier is mandatory.
#[test]
fn test_timeline_requires_machine() {
    let mdt_binary = env!("CARGO_BIN_EXE_mdt");

    let output = Command::new(mdt_binary)
        .arg("timeline")
        .output()
        .expect("Failed to run mdt timeline");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("--machine"),
        "Expected missing-argument error: {stderr}"
    );
}

/// Test that a malformed --from timestamp is rejected before any
/// network access.
#[test]
fn test_timeline_rejects_malformed_from() {
    let mdt_binary = env!("CARGO_BIN_EXE_mdt");

    let output = Command::new(mdt_binary)
        .arg("timeline")
        .arg("--machine")
        .arg("test-box")
        .arg("--from")
        .arg("not-a-time")
        .output()
        .expect("Failed to run mdt timeline");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid --from timestamp"),
        "Expected timestamp error: {stderr}"
    );
}

/// Test that a missing cookie produces an actionable error.
#[test]
fn test_timeline_reports_missing_cookie() {
    let config_file = NamedTempFile::new().unwrap();

    let mdt_binary = env!("CARGO_BIN_EXE_mdt");
    let output = Command::new(mdt_binary)
        .env_remove("MDT_COOKIE")
        .env_remove("MDT_XSRF_TOKEN")
        .arg("--config")
        .arg(config_file.path())
        .arg("timeline")
        .arg("--machine")
        .arg("test-box")
        .output()
        .expect("Failed to run mdt timeline");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing cookie (pass --cookie or set MDT_COOKIE)"),
        "Expected missing cookie error: {stderr}"
    );
}

/// Test that a missing anti-forgery token produces an actionable error.
#[test]
fn test_timeline_reports_missing_xsrf_token() {
    let config_file = NamedTempFile::new().unwrap();

    let mdt_binary = env!("CARGO_BIN_EXE_mdt");
    let output = Command::new(mdt_binary)
        .env_remove("MDT_COOKIE")
        .env_remove("MDT_XSRF_TOKEN")
        .arg("--config")
        .arg(config_file.path())
        .arg("--cookie")
        .arg("sccauth=abc123")
        .arg("timeline")
        .arg("--machine")
        .arg("test-box")
        .output()
        .expect("Failed to run mdt timeline");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("missing anti-forgery token (pass --xsrf or set MDT_XSRF_TOKEN)"),
        "Expected missing token error: {stderr}"
    );
}

/// Full export against a local mock server: events land in the output
/// file as JSON lines, appended after existing content.
#[tokio::test(flavor = "multi_thread")]
async fn test_timeline_exports_to_output_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/machines/m-1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Items": [{"id": "evt-1"}, {"id": "evt-2"}],
            "Prev": "",
            "Next": "",
        })))
        .mount(&server)
        .await;

    let mut config_file = NamedTempFile::new().unwrap();
    writeln!(config_file, r#"base_url = "{}""#, server.uri()).unwrap();
    config_file.flush().unwrap();

    let output_file = NamedTempFile::new().unwrap();
    std::fs::write(output_file.path(), "existing line\n").unwrap();

    let mdt_binary = env!("CARGO_BIN_EXE_mdt");
    let output = Command::new(mdt_binary)
        .env_remove("MDT_BASE_URL")
        .arg("--config")
        .arg(config_file.path())
        .arg("--cookie")
        .arg("sccauth=integration")
        .arg("--xsrf")
        .arg("integration-token")
        .arg("--output")
        .arg(output_file.path())
        .arg("timeline")
        .arg("--machine")
        .arg("m-1")
        .arg("--from")
        .arg("2024-01-01T00:00:00Z")
        .arg("--to")
        .arg("2024-01-02T00:00:00Z")
        .output()
        .expect("Failed to run mdt timeline");

    assert!(
        output.status.success(),
        "Export failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let contents = std::fs::read_to_string(output_file.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3, "Expected appended events: {contents}");
    assert_eq!(lines[0], "existing line");
    let first: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
    assert_eq!(first["id"], "evt-1");
    let second: serde_json::Value = serde_json::from_str(lines[2]).unwrap();
    assert_eq!(second["id"], "evt-2");
}

/// An export that fails partway still flushes every event streamed
/// before the failure to the output file.
#[tokio::test(flavor = "multi_thread")]
async fn test_partial_export_keeps_streamed_events() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/machines/m-1/events"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "Items": [{"id": "evt-1"}],
            "PartialResponseReasons": ["timeout"],
            "Prev": "",
            "Next": "",
        })))
        .mount(&server)
        .await;

    let mut config_file = NamedTempFile::new().unwrap();
    writeln!(config_file, r#"base_url = "{}""#, server.uri()).unwrap();
    config_file.flush().unwrap();

    let output_file = NamedTempFile::new().unwrap();

    let mdt_binary = env!("CARGO_BIN_EXE_mdt");
    let output = Command::new(mdt_binary)
        .env_remove("MDT_BASE_URL")
        .arg("--config")
        .arg(config_file.path())
        .arg("--cookie")
        .arg("sccauth=integration")
        .arg("--xsrf")
        .arg("integration-token")
        .arg("--output")
        .arg(output_file.path())
        .arg("timeline")
        .arg("--machine")
        .arg("m-1")
        .arg("--from")
        .arg("2024-01-01T00:00:00Z")
        .arg("--to")
        .arg("2024-01-02T00:00:00Z")
        .output()
        .expect("Failed to run mdt timeline");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("partial data"),
        "Expected partial data error: {stderr}"
    );

    let contents = std::fs::read_to_string(output_file.path()).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1, "Expected the streamed event: {contents}");
    let event: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
    assert_eq!(event["id"], "evt-1");
}
