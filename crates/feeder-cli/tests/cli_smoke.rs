//! CLI smoke tests
//!
//! These run the `feeder` binary. Device commands talk to an in-process
//! HTTP server standing in for the feeder.

#![cfg(feature = "cli")]

use std::process::{Command, Output};

use axum::Router;
use axum::routing::{get, post};
use serde_json::json;

fn feeder(args: &[&str], config_home: &std::path::Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_feeder"))
        .args(args)
        .env("XDG_CONFIG_HOME", config_home)
        .env("HOME", config_home)
        .env_remove("FEEDER_URL")
        .env("NO_COLOR", "1")
        .output()
        .expect("Failed to run feeder binary")
}

async fn feeder_async(args: Vec<String>, config_home: std::path::PathBuf) -> Output {
    tokio::task::spawn_blocking(move || {
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        feeder(&args, &config_home)
    })
    .await
    .unwrap()
}

async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
fn test_help_lists_commands() {
    let home = tempfile::tempdir().unwrap();
    let output = feeder(&["--help"], home.path());
    assert!(output.status.success());
    let text = stdout(&output);
    for command in ["status", "feed", "schedule", "log", "camera", "config", "completions"] {
        assert!(text.contains(command), "help is missing {}", command);
    }
}

#[test]
fn test_version() {
    let home = tempfile::tempdir().unwrap();
    let output = feeder(&["--version"], home.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    let output = feeder(&["completions", "bash"], home.path());
    assert!(output.status.success());
    assert!(stdout(&output).contains("feeder"));
}

#[test]
fn test_invalid_feed_size_is_rejected() {
    let home = tempfile::tempdir().unwrap();
    let output = feeder(&["feed", "--size", "9"], home.path());
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid feed size"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[cfg(target_os = "linux")]
#[test]
fn test_config_init_and_path() {
    let home = tempfile::tempdir().unwrap();

    let output = feeder(&["config", "path"], home.path());
    assert!(output.status.success());
    let path = stdout(&output).trim().to_string();
    assert!(path.ends_with("pet-feeder/config.toml"));

    let output = feeder(&["config", "init"], home.path());
    assert!(output.status.success());
    assert!(std::path::Path::new(&path).exists());

    // A second init needs --force.
    let output = feeder(&["config", "init"], home.path());
    assert!(!output.status.success());

    let output = feeder(&["config", "set", "default-pane", "log"], home.path());
    assert!(output.status.success());
    let output = feeder(&["config", "get", "default-pane"], home.path());
    assert_eq!(stdout(&output).trim(), "log");
}

// =============================================================================
// Device Tests (in-process feeder)
// =============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_status_against_server() {
    let router = Router::new()
        .route("/api/getDistance", get(|| async { axum::Json(json!({"distance": 64})) }))
        .route(
            "/api/getLastFeed",
            get(|| async { axum::Json(json!({"last_feed": ["08:00", 0]})) }),
        );
    let url = spawn_server(router).await;
    let home = tempfile::tempdir().unwrap();

    let output = feeder_async(
        vec!["status".into(), "--url".into(), url],
        home.path().to_path_buf(),
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("64%"));
    assert!(text.contains("8:00 AM | Indefinite"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_status_with_dated_last_feed() {
    let router = Router::new()
        .route("/api/getDistance", get(|| async { axum::Json(json!({"distance": 40})) }))
        .route(
            "/api/getLastFeed",
            get(|| async { axum::Json(json!({"last_feed": ["08:00", "2024-01-02"]})) }),
        );
    let url = spawn_server(router).await;
    let home = tempfile::tempdir().unwrap();

    let output = feeder_async(
        vec!["status".into(), "--url".into(), url],
        home.path().to_path_buf(),
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("8:00 AM | Unknown"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_schedule_list_json() {
    let router = Router::new().route(
        "/api/getFeedTimes",
        get(|| async { axum::Json(json!({"feed_times": [["14:30", 1, 3]]})) }),
    );
    let url = spawn_server(router).await;
    let home = tempfile::tempdir().unwrap();

    let output = feeder_async(
        vec!["schedule".into(), "--json".into(), "--url".into(), url],
        home.path().to_path_buf(),
    )
    .await;
    assert!(output.status.success(), "{}", stderr(&output));
    let value: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(value[0]["display"], "2:30 PM | One-Time | Average");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_feed_server_error_fails() {
    let router = Router::new().route(
        "/api/manualFeed",
        post(|| async {
            (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Motor not configured or not found",
            )
        }),
    );
    let url = spawn_server(router).await;
    let home = tempfile::tempdir().unwrap();

    let output = feeder_async(
        vec!["feed".into(), "--url".into(), url],
        home.path().to_path_buf(),
    )
    .await;
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("Failed to trigger feed"));
    assert!(err.contains("Motor not configured"));
}

#[test]
fn test_unreachable_feeder_fails() {
    let home = tempfile::tempdir().unwrap();
    let output = feeder(
        &["log", "--url", "http://127.0.0.1:9", "--timeout", "2"],
        home.path(),
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Failed to load feed history"));
}
