//! End-to-end routing tests through the binary.
//!
//! Covers response shape, slot isolation, exit codes and output formats.

#![allow(clippy::unwrap_used, clippy::expect_used)]
#![allow(deprecated)] // cargo_bin deprecation

use std::path::PathBuf;

use assert_cmd::Command;
use predict_api_core::{PredictionRequest, PredictionResponse, SlotResult};
use predict_api_test_support::SyntheticInput;
use predicates::prelude::*;
use serde_json::{json, Value};

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

fn json_lines(stdout: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).expect("each line is JSON"))
        .collect()
}

fn stdin_request(request: &PredictionRequest) -> String {
    serde_json::to_string(request).unwrap()
}

// === Response shape ===

#[test]
fn test_empty_request_has_every_slot() {
    let output = predict_api().arg("-").write_stdin("{}").output().unwrap();
    assert_eq!(output.status.code(), Some(0));

    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 1);
    let line = &lines[0];
    assert_eq!(line["source"], "stdin");
    assert_eq!(line["ir_detection"], json!({}));
    assert_eq!(line["audio_detection"], json!({}));
    assert!(line["timestamp"].is_string());
}

#[test]
fn test_response_parses_back() {
    let output = predict_api()
        .arg(fixtures_dir().join("single.json"))
        .output()
        .unwrap();

    let lines = json_lines(&output.stdout);
    let response: PredictionResponse = serde_json::from_value(lines[0].clone()).unwrap();
    assert!(matches!(response.ir_detection, SlotResult::Success(_)));
    assert!(matches!(response.audio_detection, SlotResult::Success(_)));
}

#[test]
fn test_sample_request_predictions() {
    let output = predict_api()
        .arg("-")
        .write_stdin(stdin_request(&SyntheticInput::sample_request()))
        .output()
        .unwrap();

    let lines = json_lines(&output.stdout);
    assert_eq!(lines[0]["ir_detection"]["status"], "ok");
    assert_eq!(lines[0]["ir_detection"]["class"], "none");
    assert_eq!(lines[0]["audio_detection"]["event"], "glass_break");
}

#[test]
fn test_timestamps_are_generated() {
    let output = predict_api()
        .arg(fixtures_dir().join("batch.json"))
        .output()
        .unwrap();

    for line in json_lines(&output.stdout) {
        let ts = line["timestamp"].as_str().unwrap();
        assert_ne!(ts, "2025-12-16T12:00:00Z");
        assert!(ts.contains('T'));
    }
}

// === Slot isolation and exit codes ===

#[test]
fn test_ir_error_leaves_audio_intact() {
    let request = PredictionRequest::new()
        .with_ir(vec![0.1, 0.2, 0.3])
        .with_audio(vec![0.9, -0.9, 0.9, -0.9]);

    let output = predict_api()
        .arg("--ir-expected-len")
        .arg("4")
        .arg("-")
        .write_stdin(stdin_request(&request))
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1), "slot error sets exit code 1");
    let lines = json_lines(&output.stdout);
    assert_eq!(
        lines[0]["ir_detection"],
        json!({"status": "error", "message": "bad shape: expected 4 values, got 3"})
    );
    assert_eq!(lines[0]["audio_detection"]["status"], "ok");
    assert_eq!(lines[0]["audio_detection"]["event"], "glass_break");
}

#[test]
fn test_slot_error_reported_on_stderr() {
    predict_api()
        .arg(fixtures_dir().join("stream.jsonl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("audio predictor audio_event failed"));
}

#[test]
fn test_disabled_slot_is_empty() {
    let output = predict_api()
        .arg("--no-audio")
        .arg(fixtures_dir().join("stream.jsonl"))
        .output()
        .unwrap();

    // The failing empty waveform is never dispatched.
    assert_eq!(output.status.code(), Some(0));
    for line in json_lines(&output.stdout) {
        assert_eq!(line["audio_detection"], json!({}));
    }
}

#[test]
fn test_wrong_slot_type_fails_only_that_slot() {
    let output = predict_api()
        .arg("-q")
        .arg("-")
        .write_stdin(r#"{"ir_input_tensor": "oops", "audio_waveform_array": [0.9, 0.8]}"#)
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["ir_detection"]["status"], "error");
    assert!(lines[0]["ir_detection"]["message"]
        .as_str()
        .unwrap()
        .contains("invalid type"));
    assert_eq!(lines[0]["audio_detection"]["status"], "ok");
    assert_eq!(lines[0]["audio_detection"]["event"], "glass_break");
}

#[test]
fn test_broken_file_routes_what_it_can() {
    let output = predict_api()
        .arg(fixtures_dir().join("broken.jsonl"))
        .output()
        .unwrap();

    // Line 2 has a wrongly typed IR value; line 3 is not JSON.
    assert_eq!(output.status.code(), Some(1));
    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 2);
    assert!(lines[0]["source"].as_str().unwrap().ends_with("broken.jsonl:1"));
    assert!(lines[1]["source"].as_str().unwrap().ends_with("broken.jsonl:2"));
    assert_eq!(lines[1]["ir_detection"]["status"], "error");
    assert_eq!(lines[1]["audio_detection"]["event"], "glass_break");
    assert!(String::from_utf8_lossy(&output.stderr).contains("Skipping"));
}

#[test]
fn test_quiet_suppresses_skip_warning() {
    predict_api()
        .arg("--quiet")
        .arg(fixtures_dir().join("broken.jsonl"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Skipping").not());
}

// === Dispatch modes ===

#[test]
fn test_concurrent_matches_sequential() {
    let run = |concurrent: bool| {
        let mut cmd = predict_api();
        if concurrent {
            cmd.arg("--concurrent");
        }
        let output = cmd.arg(fixtures_dir().join("stream.jsonl")).output().unwrap();
        json_lines(&output.stdout)
            .into_iter()
            .map(|mut line| {
                line.as_object_mut().unwrap().remove("timestamp");
                line
            })
            .collect::<Vec<_>>()
    };

    assert_eq!(run(false), run(true));
}

#[test]
fn test_generous_timeout_succeeds() {
    predict_api()
        .arg("--timeout-ms")
        .arg("5000")
        .arg("--concurrent")
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .code(0);
}

// === Output formats ===

#[test]
fn test_jsonl_one_object_per_request() {
    let output = predict_api()
        .arg("--format")
        .arg("jsonl")
        .arg(fixtures_dir().join("batch.json"))
        .output()
        .unwrap();

    let lines = json_lines(&output.stdout);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(Value::is_object));
    assert!(lines[1]["source"].as_str().unwrap().ends_with("batch.json[1]"));
}

#[test]
fn test_json_array_format() {
    let output = predict_api()
        .arg("--format")
        .arg("json")
        .arg(fixtures_dir().join("batch.json"))
        .arg(fixtures_dir().join("single.json"))
        .output()
        .unwrap();

    let value: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value.as_array().unwrap().len(), 4);
}

#[test]
fn test_pretty_json_is_multiline() {
    let output = predict_api()
        .arg("--format")
        .arg("json")
        .arg("--pretty")
        .arg(fixtures_dir().join("single.json"))
        .output()
        .unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.lines().count() > 1);
    assert!(stdout.trim_start().starts_with('['));
}

#[test]
fn test_recursive_directory() {
    let flat = predict_api().arg(fixtures_dir()).output().unwrap();
    let deep = predict_api()
        .arg("--recursive")
        .arg(fixtures_dir())
        .output()
        .unwrap();

    assert_eq!(
        json_lines(&deep.stdout).len(),
        json_lines(&flat.stdout).len() + 1
    );
}
