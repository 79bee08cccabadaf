//! Integration tests for the `availability` CLI binary.
//!
//! These tests use `assert_cmd` and `predicates` to exercise the slots, eta,
//! check and hours subcommands through the actual binary, including stdin
//! piping, file I/O and error handling.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture must exist")
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    serde_json::from_slice(&output.stdout).expect("stdout must be JSON")
}

// ─────────────────────────────────────────────────────────────────────────────
// slots
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn slots_from_file_skip_booked_time() {
    let output = Command::cargo_bin("availability")
        .unwrap()
        .args(["slots", "-i", &fixture("slots.json"), "--now", "2026-03-01T00:00:00Z"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let slots = stdout_json(&output);
    let labels: Vec<&str> = slots
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["displayLabel"].as_str().unwrap())
        .collect();

    assert_eq!(labels.len(), 13);
    assert_eq!(labels[0], "09:00");
    assert!(!labels.contains(&"10:00"));
    assert!(!labels.contains(&"12:00"));
}

#[test]
fn slots_from_stdin_round_now_up() {
    let output = Command::cargo_bin("availability")
        .unwrap()
        .args(["slots", "--now", "2026-03-16T10:07:00Z"])
        .write_stdin(read_fixture("slots.json"))
        .output()
        .unwrap();

    assert!(output.status.success());
    let slots = stdout_json(&output);
    assert_eq!(slots[0]["displayLabel"], "10:30");
    assert_eq!(slots.as_array().unwrap().len(), 3 + 8);
}

#[test]
fn slots_on_closed_day_print_empty_list() {
    let request = read_fixture("slots.json").replace("2026-03-16\",", "2026-03-17\",");

    Command::cargo_bin("availability")
        .unwrap()
        .args(["slots", "--now", "2026-03-01T00:00:00Z"])
        .write_stdin(request)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn slots_with_string_duration_print_empty_list() {
    let request = read_fixture("slots.json").replace(
        "\"estimatedDurationMinutes\": 30",
        "\"estimatedDurationMinutes\": \"30\"",
    );

    Command::cargo_bin("availability")
        .unwrap()
        .args(["slots", "--now", "2026-03-01T00:00:00Z"])
        .write_stdin(request)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

#[test]
fn slots_write_to_output_file() {
    let output_path = std::env::temp_dir().join("availability-cli-slots.json");
    let _ = std::fs::remove_file(&output_path);

    Command::cargo_bin("availability")
        .unwrap()
        .args(["slots", "-i", &fixture("slots.json"), "--now", "2026-03-01T00:00:00Z", "-o"])
        .arg(&output_path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let content = std::fs::read_to_string(&output_path).expect("output file must exist");
    let slots: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(slots.as_array().unwrap().len(), 13);

    let _ = std::fs::remove_file(&output_path);
}

#[test]
fn invalid_now_is_rejected() {
    Command::cargo_bin("availability")
        .unwrap()
        .args(["slots", "-i", &fixture("slots.json"), "--now", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid --now value"));
}

#[test]
fn malformed_request_is_rejected() {
    Command::cargo_bin("availability")
        .unwrap()
        .arg("slots")
        .write_stdin("{\"company\": ")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse slot request"));
}

#[test]
fn missing_input_file_is_rejected() {
    Command::cargo_bin("availability")
        .unwrap()
        .args(["slots", "-i", "/nonexistent/request.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// eta
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn eta_accounts_for_queue_and_bookings() {
    let output = Command::cargo_bin("availability")
        .unwrap()
        .args(["eta", "-i", &fixture("queue.json"), "--now", "2026-03-16T10:07:00Z"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let estimate = stdout_json(&output);
    let start = estimate["estimatedStart"].as_str().unwrap();
    assert!(start.starts_with("2026-03-16T13:00:00"), "got {}", start);
    assert_eq!(estimate["peopleAhead"], 2);
    assert_eq!(estimate["waitMinutes"], 173);
}

#[test]
fn eta_after_closing_is_null() {
    Command::cargo_bin("availability")
        .unwrap()
        .args(["eta", "-i", &fixture("queue.json"), "--now", "2026-03-16T17:30:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("null"));
}

#[test]
fn verbose_logs_reason_to_stderr() {
    Command::cargo_bin("availability")
        .unwrap()
        .args(["eta", "-v", "-i", &fixture("queue.json"), "--now", "2026-03-17T10:00:00Z"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("null"))
        .stderr(predicate::str::contains("closed"));
}

// ─────────────────────────────────────────────────────────────────────────────
// check
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn check_reports_conflict_and_fails() {
    let output = Command::cargo_bin("availability")
        .unwrap()
        .args(["check", "-i", &fixture("conflict.json")])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let conflicts = stdout_json(&output);
    assert_eq!(conflicts.as_array().unwrap().len(), 1);
    assert_eq!(conflicts[0]["overlapMinutes"], 30);
}

#[test]
fn check_without_conflict_succeeds() {
    let request = r#"{
        "proposed": {"startTime": "2026-03-16T10:00:00Z", "endTime": "2026-03-16T10:30:00Z", "providerId": "ana"},
        "bookings": [
            {"startTime": "2026-03-16T10:30:00Z", "endTime": "2026-03-16T11:00:00Z", "providerId": "ana"}
        ]
    }"#;

    Command::cargo_bin("availability")
        .unwrap()
        .arg("check")
        .write_stdin(request)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("[]"));
}

// ─────────────────────────────────────────────────────────────────────────────
// hours
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn hours_are_normalized() {
    let output = Command::cargo_bin("availability")
        .unwrap()
        .args(["hours", "-i", &fixture("hours.json")])
        .output()
        .unwrap();

    assert!(output.status.success());
    let hours = stdout_json(&output);
    assert_eq!(
        hours["1"],
        serde_json::json!([
            {"start": "09:00", "end": "12:00"},
            {"start": "13:00", "end": "17:00"}
        ])
    );
    assert_eq!(hours["2"], serde_json::json!([]));
    assert_eq!(hours["6"], serde_json::json!([{"start": "10:00", "end": "14:00"}]));
}

#[test]
fn hours_garbage_is_all_closed() {
    let output = Command::cargo_bin("availability")
        .unwrap()
        .arg("hours")
        .write_stdin("not json at all")
        .output()
        .unwrap();

    assert!(output.status.success());
    let hours = stdout_json(&output);
    for day in 0..7 {
        assert_eq!(hours[day.to_string()], serde_json::json!([]));
    }
}

#[test]
fn no_subcommand_prints_usage() {
    Command::cargo_bin("availability")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}
