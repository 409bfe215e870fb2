//! Integration tests for configuration layering.
//!
//! Tests the full priority chain: hardcoded defaults < XDG config < project config < CLI args

#![allow(clippy::unwrap_used)]
#![allow(deprecated)] // cargo_bin deprecation warning

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("predict-api-adapters/tests/fixtures")
}

/// Command running in `cwd` with XDG config rooted at `xdg`.
fn predict_api(cwd: &Path, xdg: &Path) -> Command {
    let mut cmd = Command::cargo_bin("predict-api").unwrap();
    cmd.current_dir(cwd).env("XDG_CONFIG_HOME", xdg);
    cmd
}

fn write_xdg_config(xdg: &Path, content: &str) {
    let dir = xdg.join("predict-api");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("config.toml"), content).unwrap();
}

#[test]
fn test_project_config_applies_format() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    fs::write(project.path().join(".predict-api.toml"), "[output]\nformat = 'json'\n").unwrap();

    predict_api(project.path(), xdg.path())
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_cli_overrides_project_config() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    fs::write(project.path().join(".predict-api.toml"), "[output]\nformat = 'json'\n").unwrap();

    predict_api(project.path(), xdg.path())
        .arg("--format")
        .arg("jsonl")
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .code(0)
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_project_config_overrides_xdg() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    write_xdg_config(xdg.path(), "[output]\nformat = 'json'\n");
    fs::write(project.path().join(".predict-api.toml"), "[output]\nformat = 'jsonl'\n").unwrap();

    predict_api(project.path(), xdg.path())
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_xdg_config_applies() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    write_xdg_config(xdg.path(), "[output]\nformat = 'json'\n");

    predict_api(project.path(), xdg.path())
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .stdout(predicate::str::starts_with("["));
}

#[test]
fn test_config_disables_slot() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    fs::write(project.path().join(".predict-api.toml"), "[audio]\nenabled = false\n").unwrap();

    predict_api(project.path(), xdg.path())
        .arg(fixtures_dir().join("stream.jsonl"))
        .assert()
        .code(0)
        .stdout(predicate::str::contains("\"audio_detection\":{}"));
}

#[test]
fn test_config_expected_len_causes_slot_error() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    fs::write(project.path().join(".predict-api.toml"), "[ir]\nexpected_len = 8\n").unwrap();

    predict_api(project.path(), xdg.path())
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .code(1)
        .stdout(predicate::str::contains("bad shape: expected 8 values, got 4"));
}

#[test]
fn test_invalid_config_warns_and_falls_back() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".predict-api.toml"),
        "[output]\nformat = 'xml'\n",
    )
    .unwrap();

    predict_api(project.path(), xdg.path())
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("output.format"))
        .stdout(predicate::str::starts_with("{"));
}

#[test]
fn test_all_slots_disabled_warns() {
    let project = tempfile::tempdir().unwrap();
    let xdg = tempfile::tempdir().unwrap();
    fs::write(
        project.path().join(".predict-api.toml"),
        "[ir]\nenabled = false\n\n[audio]\nenabled = false\n",
    )
    .unwrap();

    predict_api(project.path(), xdg.path())
        .arg(fixtures_dir().join("single.json"))
        .assert()
        .code(0)
        .stderr(predicate::str::contains("All prediction slots disabled"));
}
