//! CLI integration tests

use std::process::{Command, Output};

fn hos(args: &[&str]) -> Output {
    Command::new("cargo")
        .args(["run", "-q", "-p", "hos-cli", "--"])
        .args(args)
        .env("HOME", std::env::temp_dir())
        .env_remove("HOS_API_URL")
        .output()
        .expect("Failed to execute command")
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = hos(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("HOS Compliance Scheduler"),
        "Should show app name"
    );
    assert!(stdout.contains("plan"), "Should show plan command");
    assert!(stdout.contains("limits"), "Should show limits command");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = hos(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("hos"), "Should show binary name");
}

#[test]
fn test_plan_help() {
    let output = hos(&["plan", "--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Plan help should succeed");
    for flag in [
        "--miles",
        "--cycle-used",
        "--departure",
        "--pickup",
        "--dropoff",
        "--mode",
        "--sleeper-berth",
        "--remote",
    ] {
        assert!(stdout.contains(flag), "Should show {} option", flag);
    }
}

#[test]
fn test_plan_locally_as_json() {
    let output = hos(&[
        "plan",
        "--miles",
        "1200",
        "--cycle-used",
        "0",
        "--departure",
        "2025-03-03T06:00",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "Local plan should succeed");

    let schedule: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(schedule["timeline"]["stops"].as_array().unwrap().len(), 2);
    assert_eq!(schedule["day_logs"].as_array().unwrap().len(), 2);
}

#[test]
fn test_plan_with_negative_longitudes() {
    let output = hos(&[
        "plan",
        "--miles",
        "700",
        "--cycle-used",
        "5",
        "--departure",
        "2025-03-03T06:00",
        "--pickup",
        "-90.20,38.63",
        "--dropoff",
        "-104.99,39.74",
        "--mode",
        "stop-aware",
        "--format",
        "json",
    ]);
    assert!(output.status.success(), "Plan with a route should succeed");

    let schedule: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let stop = &schedule["timeline"]["stops"][0];
    assert_eq!(stop["location"]["longitude"], -90.2);
}

#[test]
fn test_plan_rejects_full_cycle() {
    let output = hos(&[
        "plan",
        "--miles",
        "500",
        "--cycle-used",
        "70",
        "--departure",
        "2025-03-03T06:00",
    ]);
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert!(!output.status.success(), "Full cycle should be rejected");
    assert!(stderr.contains("insufficient cycle hours"));
}

#[test]
fn test_plan_rejects_bad_departure() {
    let output = hos(&[
        "plan",
        "--miles",
        "500",
        "--cycle-used",
        "0",
        "--departure",
        "tomorrow",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("YYYY-MM-DDTHH:MM"));
}

#[test]
fn test_limits_table() {
    let output = hos(&["limits"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Limits should succeed");
    assert!(stdout.contains("Max daily driving"));
    assert!(stdout.contains("70h / 8 days"));
}
