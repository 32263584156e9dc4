//! Tests for command-line handling of the squat-analysis binary

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn run_binary(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_squat-analysis"))
        .args(args)
        .output()
        .expect("Failed to execute squat-analysis")
}

fn write_empty_recording(dir: &Path) -> String {
    let path = dir.join("empty.json");
    fs::write(&path, r#"{"fps": 30.0, "frames": []}"#).unwrap();
    path.to_string_lossy().into_owned()
}

fn write_config(dir: &Path, content: &str) -> String {
    let path = dir.join("config.yaml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn test_replay_with_default_config() {
    let dir = TempDir::new().unwrap();
    let recording = write_empty_recording(dir.path());

    let out = run_binary(&["--replay", &recording]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stdout).contains("Reps: 0.0"));
}

#[test]
fn test_unparseable_config_is_fatal() {
    let dir = TempDir::new().unwrap();
    let recording = write_empty_recording(dir.path());
    let config = write_config(dir.path(), "tracker:\n  capacity: -5\n");

    let out = run_binary(&["--config", &config, "--replay", &recording]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Failed to load config file"));
}

#[test]
fn test_invalid_config_values_are_fatal() {
    let dir = TempDir::new().unwrap();
    let recording = write_empty_recording(dir.path());
    let config = write_config(
        dir.path(),
        "tracker:\n  min_diameter_fraction: 0.5\n  max_diameter_fraction: 0.1\n",
    );

    let out = run_binary(&["--config", &config, "--replay", &recording]);
    assert!(!out.status.success());
}

#[test]
fn test_missing_config_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let recording = write_empty_recording(dir.path());
    let missing = dir.path().join("nope.yaml");

    let out = run_binary(&["--config", &missing.to_string_lossy(), "--replay", &recording]);
    assert!(!out.status.success());
}

#[test]
fn test_video_and_replay_conflict() {
    let out = run_binary(&["--video", "lift.mp4", "--replay", "lift.json"]);
    assert!(!out.status.success());
}

#[test]
fn test_print_config_is_valid_yaml() {
    let out = run_binary(&["--print-config"]);
    assert!(out.status.success());
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &String::from_utf8_lossy(&out.stdout));
    let recording = write_empty_recording(dir.path());

    let out = run_binary(&["--config", &config, "--replay", &recording]);
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
}
