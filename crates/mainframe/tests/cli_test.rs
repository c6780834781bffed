//! Integration tests for the `mainframe` CLI binary.
//!
//! Argument parsing, help, completions and the theme store run offline.
//! Backend-facing commands run against a wiremock server.
#![allow(clippy::unwrap_used)]

use std::path::{Path, PathBuf};
use std::process::Output;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command for the `mainframe` binary with env isolation.
///
/// Clears `MAINFRAME_*` variables and points every platform directory at
/// `home` so tests never touch the user's real config or state.
fn mainframe_cmd(home: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("mainframe");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env("XDG_CACHE_HOME", home.join("cache"))
        .env_remove("MAINFRAME_URL")
        .env_remove("MAINFRAME_CONFIG")
        .env_remove("MAINFRAME_OUTPUT")
        .env_remove("MAINFRAME_INSECURE")
        .env_remove("MAINFRAME_TIMEOUT")
        .env_remove("MAINFRAME_API_PREFIX")
        .env_remove("RUST_LOG")
        .arg("--color")
        .arg("never");
    cmd
}

fn combined_output(output: &Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// Run the binary off the async runtime so the mock server keeps serving.
async fn run_cli(home: PathBuf, args: &[&str]) -> Output {
    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
    tokio::task::spawn_blocking(move || mainframe_cmd(&home).args(args).output().unwrap())
        .await
        .unwrap()
}

async fn backend() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/system"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "cpuUsage": 92,
            "ramUsage": 50,
            "ramUsed": "4.0 GB",
            "ramTotal": "8.0 GB"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/buttons"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "type": "action", "label": "Reboot", "endpoint": "/reboot" },
            { "id": "fan", "type": "toggle", "label": "Fan", "endpoint": "/fan", "toggleState": false },
            { "id": "uptime", "type": "stat", "label": "Uptime", "value": "3 days" },
            {
                "id": "nas",
                "type": "redirectButton",
                "label": "NAS",
                "redirectUrl": "https://nas.local/",
                "statusApiEndpoint": "/status/nas"
            }
        ])))
        .mount(&server)
        .await;
    server
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = mainframe_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path()).arg("--help").assert().success().stdout(
        predicate::str::contains("system")
            .and(predicate::str::contains("widgets"))
            .and(predicate::str::contains("status"))
            .and(predicate::str::contains("theme")),
    );
}

#[test]
fn version_flag() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("mainframe"));
}

#[test]
fn completions_for_each_shell() {
    let home = tempfile::tempdir().unwrap();
    for shell in ["bash", "zsh", "fish"] {
        mainframe_cmd(home.path())
            .args(["completions", shell])
            .assert()
            .success()
            .stdout(predicate::str::is_empty().not());
    }
}

#[test]
fn unknown_subcommand_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path())
        .arg("reboot-everything")
        .assert()
        .code(2);
}

// ── Theme ───────────────────────────────────────────────────────────

#[test]
fn theme_defaults_to_nebula() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path())
        .args(["theme", "get"])
        .assert()
        .success()
        .stdout("nebula\n");
}

#[test]
fn theme_set_persists_between_runs() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path())
        .args(["theme", "set", "Glacier"])
        .assert()
        .success();
    mainframe_cmd(home.path())
        .args(["theme", "get"])
        .assert()
        .success()
        .stdout("glacier\n");
    mainframe_cmd(home.path())
        .args(["theme", "next"])
        .assert()
        .success()
        .stdout("ember\n");
}

#[test]
fn theme_next_wraps_after_last() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path())
        .args(["theme", "set", "mono"])
        .assert()
        .success();
    mainframe_cmd(home.path())
        .args(["theme", "next"])
        .assert()
        .success()
        .stdout("nebula\n");
}

#[test]
fn theme_set_rejects_unknown_name() {
    let home = tempfile::tempdir().unwrap();
    let output = mainframe_cmd(home.path())
        .args(["theme", "set", "neon"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown theme 'neon'"));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn config_show_reflects_overrides() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path())
        .args(["--url", "http://pi.local:8080", "config", "show", "-o", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"url\": \"http://pi.local:8080\""));
}

#[test]
fn config_defaults_choose_output_format() {
    let home = tempfile::tempdir().unwrap();
    let cfg = home.path().join("mainframe.toml");
    std::fs::write(
        &cfg,
        "url = \"http://pi.local:8080\"\n\n[defaults]\noutput = \"plain\"\n",
    )
    .unwrap();
    let cfg = cfg.to_str().unwrap();

    mainframe_cmd(home.path())
        .args(["--config", cfg, "config", "show"])
        .assert()
        .success()
        .stdout("http://pi.local:8080\n");

    // An explicit flag still wins over the config.
    mainframe_cmd(home.path())
        .args(["--config", cfg, "-o", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"url\": \"http://pi.local:8080\""));
}

#[test]
fn unknown_config_default_output_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let cfg = home.path().join("mainframe.toml");
    std::fs::write(&cfg, "[defaults]\noutput = \"xml\"\n").unwrap();

    let output = mainframe_cmd(home.path())
        .args(["--config", cfg.to_str().unwrap(), "theme", "get"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("defaults.output"));
}

#[test]
fn invalid_url_scheme_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    mainframe_cmd(home.path())
        .args(["--url", "ftp://pi.local", "system"])
        .assert()
        .code(2);
}

// ── Backend commands ────────────────────────────────────────────────

#[tokio::test(flavor = "multi_thread")]
async fn system_reports_bands() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "-o", "json", "system"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["cpuBand"], "Critical");
    assert_eq!(body["ramBand"], "Healthy");
    assert_eq!(body["ramTotal"], "8.0 GB");
}

#[tokio::test(flavor = "multi_thread")]
async fn widgets_list_keeps_backend_order() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "-o", "plain", "widgets", "list"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1\nfan\nuptime\nnas\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn missing_widget_exits_not_found() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "widgets", "get", "nope"],
    )
    .await;
    assert_eq!(output.status.code(), Some(4));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_action_posts_to_endpoint() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/reboot"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "widgets", "run", "1"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert!(combined_output(&output).contains("Reboot succeeded"));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_stat_is_rejected() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "widgets", "run", "uptime"],
    )
    .await;
    assert_eq!(output.status.code(), Some(2));
}

#[tokio::test(flavor = "multi_thread")]
async fn run_redirect_without_open_prints_target() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "widgets", "run", "nas", "--no-open"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "https://nas.local/\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn toggle_sends_requested_state() {
    let server = backend().await;
    Mock::given(method("POST"))
        .and(path("/api/fan"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "-o", "plain", "widgets", "toggle", "fan", "on"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "on\n");

    let posted: Vec<serde_json::Value> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/api/fan")
        .map(|r| serde_json::from_slice(&r.body).unwrap())
        .collect();
    assert_eq!(posted, vec![json!({ "enabled": true })]);
}

#[tokio::test(flavor = "multi_thread")]
async fn toggle_on_non_toggle_widget_is_usage_error() {
    let server = backend().await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "widgets", "toggle", "1"],
    )
    .await;
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("not a toggle"));
}

#[tokio::test(flavor = "multi_thread")]
async fn status_probes_declared_checks() {
    let server = backend().await;
    Mock::given(method("GET"))
        .and(path("/api/status/nas"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "online": true })))
        .mount(&server)
        .await;
    let home = tempfile::tempdir().unwrap();
    let output = run_cli(
        home.path().to_path_buf(),
        &["--url", &server.uri(), "-o", "plain", "status"],
    )
    .await;

    assert!(output.status.success(), "{}", combined_output(&output));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "nas online\n");
}

#[test]
fn unreachable_backend_exits_with_connection_code() {
    let home = tempfile::tempdir().unwrap();
    let output = mainframe_cmd(home.path())
        .args(["--url", "http://127.0.0.1:9", "--timeout", "5", "system"])
        .output()
        .unwrap();
    assert_eq!(
        output.status.code(),
        Some(7),
        "{}",
        combined_output(&output)
    );
}
