//! CLI integration tests for the Gatehouse command-line interface.
//!
//! These tests verify:
//! - Help text is displayed correctly
//! - Argument parsing works as expected
//! - Invalid inputs are rejected with appropriate messages
//! - Remote outcomes map to output and exit status
//!
//! Every command runs against an isolated config directory so a developer's
//! own config.toml never leaks in.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Get a command for the gatehouse binary with a clean environment.
fn gatehouse(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gatehouse").unwrap();
    cmd.current_dir(dir.path())
        .env("GATEHOUSE_CONFIG_DIR", dir.path())
        .env_remove("GATEHOUSE_ENDPOINT")
        .env_remove("GATEHOUSE_PROJECT_ID")
        .env_remove("GATEHOUSE_CACHE_ENABLED")
        .env_remove("GATEHOUSE_CACHE_DURATION_SECS");
    cmd
}

// ─────────────────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_help_displays() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sign users in and manage sessions"));
}

#[test]
fn test_version_displays() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("gatehouse"));
}

#[test]
fn test_help_lists_subcommands() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("signin"))
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_help_shows_global_options() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--verbose"))
        .stdout(predicate::str::contains("--json"))
        .stdout(predicate::str::contains("--endpoint"))
        .stdout(predicate::str::contains("--project-id"))
        .stdout(predicate::str::contains("--no-cache"));
}

#[test]
fn test_signin_help() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["signin", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("email"))
        .stdout(predicate::str::contains("verify-email"))
        .stdout(predicate::str::contains("social"))
        .stdout(predicate::str::contains("verify-social"));
}

#[test]
fn test_session_help() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["session", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("refresh"))
        .stdout(predicate::str::contains("invalidate"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Argument Validation Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_subcommand_fails() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .arg("nonexistent")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_social_type_rejected() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["signin", "social", "myspace"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("myspace"));
}

#[test]
fn test_invalid_invalidate_scope_rejected() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["session", "invalidate", "tok", "--scope", "everything"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("everything"));
}

#[test]
fn test_verify_email_requires_code() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["signin", "verify-email", "a@b.c"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("<CODE>"));
}

#[test]
fn test_missing_endpoint_fails() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["--project-id", "p1", "session", "info", "tok"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GATEHOUSE_ENDPOINT"));
}

#[test]
fn test_missing_project_id_fails() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["--endpoint", "auth.example.com", "session", "info", "tok"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GATEHOUSE_PROJECT_ID"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Config Command Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_reads_project_file() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("gatehouse.toml"),
        "endpoint = \"auth.example.com\"\nproject_id = \"p1\"\n\n[cache]\nduration_secs = 30\n",
    )
    .unwrap();

    gatehouse(&dir)
        .args(["--json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"endpoint\": \"auth.example.com\""))
        .stdout(predicate::str::contains("\"project_id\": \"p1\""))
        .stdout(predicate::str::contains("\"cache_duration_secs\": 30"))
        .stdout(predicate::str::contains("gatehouse.toml\""));
}

#[test]
fn test_config_show_flags_override_env() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .env("GATEHOUSE_ENDPOINT", "env.example.com")
        .args(["--json", "--endpoint", "flag.example.com", "--no-cache", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("flag.example.com"))
        .stdout(predicate::str::contains("\"cache_enabled\": false"));
}

#[test]
fn test_config_path_uses_config_dir() {
    let dir = TempDir::new().unwrap();
    gatehouse(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Remote Outcome Tests
// ─────────────────────────────────────────────────────────────────────────────

async fn run_against(server: &MockServer, args: &'static [&'static str]) -> assert_cmd::assert::Assert {
    let endpoint = server.uri();
    tokio::task::spawn_blocking(move || {
        let dir = TempDir::new().unwrap();
        gatehouse(&dir)
            .args(["--json", "--endpoint", endpoint.as_str(), "--project-id", "p1"])
            .args(args)
            .assert()
    })
    .await
    .unwrap()
}

#[tokio::test(flavor = "multi_thread")]
async fn test_session_info_success_prints_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/info"))
        .and(body_json(serde_json::json!({
            "project_id": "p1",
            "session_token": "tok"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "email": "a@b.c",
            "expiration": 1_900_000_000,
            "refresh_left": 4
        })))
        .expect(1)
        .mount(&server)
        .await;

    run_against(&server, &["session", "info", "tok"])
        .await
        .success()
        .stdout(predicate::str::contains("\"error\": \"none\""))
        .stdout(predicate::str::contains("\"email\": \"a@b.c\""))
        .stdout(predicate::str::contains("\"refresh_left\": 4"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_remote_error_code_sets_failure_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/refresh"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(serde_json::json!({ "error": "out_of_refresh" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    run_against(&server, &["session", "refresh", "tok"])
        .await
        .failure()
        .stdout(predicate::str::contains("\"error\": \"out_of_refresh\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_signin_email_acknowledged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/signin/email"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    run_against(&server, &["signin", "email", "a@b.c"])
        .await
        .success()
        .stdout(predicate::str::contains("\"error\": \"none\""));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_server_failure_reports_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/session/invalidate"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    run_against(&server, &["session", "invalidate", "tok", "--scope", "all"])
        .await
        .failure()
        .stdout(predicate::str::contains("\"error\": \"connection_error\""));
}
