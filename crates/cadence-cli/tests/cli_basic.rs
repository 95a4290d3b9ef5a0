//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against a temporary snapshot and
//! config file, pinning the clock with `--now`.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(dir: &Path, args: &[&str]) -> (String, String, i32) {
    let snapshot = dir.join("snapshot.json");
    let config = dir.join("config.toml");
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "cadence-cli", "--"])
        .arg("--snapshot")
        .arg(&snapshot)
        .arg("--config")
        .arg(&config)
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let (stdout, stderr, code) = run_cli(dir, args);
    assert_eq!(code, 0, "CLI command failed: {args:?}\n{stderr}");
    serde_json::from_str(&stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_next_start_weekly() {
    let dir = tempfile::tempdir().unwrap();
    let bounds = run_json(
        dir.path(),
        &["next-start", "--unit", "week", "--from", "2024-01-01T09:00:00Z"],
    );
    assert_eq!(bounds["start"], "2024-01-08T00:00:00Z");
    assert_eq!(bounds["end"], "2024-01-14T23:59:59Z");
}

#[test]
fn test_next_start_rejects_unknown_unit() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["next-start", "--unit", "fortnight"]);
    assert_ne!(code, 0);
}

#[test]
fn test_task_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    let task = run_json(
        path,
        &[
            "task", "add", "Water plants", "--every", "3d", "--id", "plants",
            "--now", "2024-01-01T08:00:00Z",
        ],
    );
    assert_eq!(task["id"], "plants");

    let report = run_json(path, &["available", "--now", "2024-01-01T09:00:00Z"]);
    assert_eq!(report["available"].as_array().unwrap().len(), 1);

    let outcome = run_json(path, &["complete", "plants", "--now", "2024-01-01T09:00:00Z"]);
    assert_eq!(outcome["next_available_at"], "2024-01-04T00:00:00Z");

    let report = run_json(path, &["available", "--now", "2024-01-02T09:00:00Z"]);
    assert!(report["available"].as_array().unwrap().is_empty());
    assert_eq!(report["dormant"].as_array().unwrap().len(), 1);

    let report = run_json(path, &["available", "--now", "2024-01-04T09:00:00Z"]);
    assert_eq!(report["available"].as_array().unwrap().len(), 1);

    let (_, stderr, code) = run_cli(path, &["task", "remove", "plants"]);
    assert_eq!(code, 0, "{stderr}");
    let tasks = run_json(path, &["task", "list"]);
    assert!(tasks.as_array().unwrap().is_empty());
}

#[test]
fn test_habit_log_and_streak() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    run_json(
        path,
        &["task", "add", "Walk", "--habit", "--id", "walk", "--now", "2024-01-01T00:00:00Z"],
    );
    for day in ["2024-01-01T08:00:00Z", "2024-01-02T08:00:00Z"] {
        run_json(path, &["log", "walk", "--now", day]);
    }

    let info = run_json(path, &["streak", "walk", "--now", "2024-01-02T20:00:00Z"]);
    assert_eq!(info["current_streak"], 2);
    assert_eq!(info["longest_streak"], 2);
    assert_eq!(info["is_active_today"], true);
}

#[test]
fn test_complete_unknown_task_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["complete", "missing"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not found"));
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    let (_, stderr, code) = run_cli(path, &["config", "set", "windows.month_days", "31"]);
    assert_eq!(code, 0, "{stderr}");
    let (stdout, _, code) = run_cli(path, &["config", "get", "windows.month_days"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "31");

    let (_, _, code) = run_cli(path, &["config", "get", "windows.nope"]);
    assert_ne!(code, 0);
}

#[test]
fn test_streak_of_simple_task_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    run_json(
        path,
        &["task", "add", "Taxes", "--every", "yearly", "--id", "taxes", "--now", "2024-01-01T00:00:00Z"],
    );
    let (_, stderr, code) = run_cli(path, &["streak", "taxes", "--now", "2024-01-02T00:00:00Z"]);
    assert_ne!(code, 0);
    assert!(stderr.contains("not a habit"));
}
