//! CLI argument validation tests.
//!
//! Tests command-line argument parsing, validation, and error handling.

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("predict-api-adapters/tests/fixtures")
}

fn predict_api() -> Command {
    let mut cmd = Command::cargo_bin("predict-api").unwrap();
    cmd.env("XDG_CONFIG_HOME", std::env::temp_dir().join("predict-api-no-config"));
    cmd
}

// === Missing/Invalid Path Tests ===

#[test]
fn test_missing_path_shows_error() {
    predict_api()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No paths specified"));
}

#[test]
fn test_nonexistent_path_warns_but_continues() {
    predict_api()
        .arg("/nonexistent/path/requests.json")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_empty_directory() {
    let temp_dir = tempfile::tempdir().unwrap();

    predict_api()
        .arg(temp_dir.path())
        .assert()
        .code(0)
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_unsupported_file_type_warns() {
    predict_api()
        .arg(fixtures_dir().join("notes.txt"))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("Unsupported file type"));
}

// === Format Validation Tests ===

#[test]
fn test_invalid_format_rejected() {
    predict_api()
        .arg("--format")
        .arg("xml")
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("json").or(predicate::str::contains("jsonl")));
}

#[test]
fn test_valid_formats_accepted() {
    for format in ["json", "jsonl"] {
        predict_api()
            .arg("--format")
            .arg(format)
            .arg(fixtures_dir().join("single.json"))
            .assert()
            .code(0);
    }
}

// === Threshold / Numeric Validation ===

#[test]
fn test_threshold_out_of_range_rejected() {
    predict_api()
        .arg("--ir-threshold")
        .arg("2.0")
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("2 is not in 0.0..=1.0"));
}

#[test]
fn test_threshold_not_a_number_rejected() {
    predict_api()
        .arg("--audio-threshold")
        .arg("loud")
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("'loud' is not a valid number"));
}

#[test]
fn test_zero_timeout_rejected() {
    predict_api()
        .arg("--timeout-ms")
        .arg("0")
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be at least 1"));
}

// === Subcommands ===

#[test]
fn test_route_subcommand_matches_default() {
    predict_api()
        .arg("route")
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("ir_detection"));
}

#[test]
fn test_slots_lists_every_slot() {
    predict_api()
        .arg("slots")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("ir_input_tensor -> ir_detection (ir_status)")
                .and(predicate::str::contains(
                    "audio_waveform_array -> audio_detection (audio_event)",
                ))
                .and(predicate::str::contains("2/2 slots enabled")),
        );
}

#[test]
fn test_slots_json() {
    let output = predict_api().arg("slots").arg("--json").output().unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let rows = value.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["slot"], "ir");
    assert_eq!(rows[1]["output_key"], "audio_detection");
}

#[test]
fn test_help_mentions_stdin() {
    predict_api()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("- for stdin"));
}
