//! CLI integration tests for particle-rs

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const FOUNTAIN_JSON: &str = r#"{
    "spawn_rate": 10,
    "lifetime": "1",
    "velocity": "0 5 0",
    "acceleration": "0 -10 0",
    "color": "white, black",
    "seed": 42
}"#;

const BURST_YAML: &str = "spawn_type: burst\nspawn_rate: 5\nlifetime: \"2\"\nseed: 7\n";

fn write_descriptor(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn particle_rs() -> Command {
    Command::cargo_bin("particle-rs").unwrap()
}

#[test]
fn test_help() {
    particle_rs()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("simulate"))
        .stdout(predicate::str::contains("bounds"));
}

#[test]
fn test_info_table() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "fountain.json", FOUNTAIN_JSON);
    particle_rs()
        .arg("info")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Particles"))
        .stdout(predicate::str::contains("10"));
}

#[test]
fn test_info_json_from_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "burst.yaml", BURST_YAML);
    let output = particle_rs()
        .args(["info", "--format", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["spawn_type"], "Burst");
    assert_eq!(report["particle_count"], 10);
    assert_eq!(report["seed"], 7);
}

#[test]
fn test_bounds_json() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "fountain.json", FOUNTAIN_JSON);
    let output = particle_rs()
        .args(["bounds", "-f", "json"])
        .arg(&path)
        .output()
        .unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["max"][1], 1.25);
    assert_eq!(report["min"][1], 0.0);
}

#[test]
fn test_simulate_summary() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "fountain.json", FOUNTAIN_JSON);
    particle_rs()
        .args(["simulate", "--seconds", "1", "--fps", "20", "--every", "5"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ticks:          20"))
        .stdout(predicate::str::contains("State:          scheduling"))
        .stdout(predicate::str::contains("t="));
}

#[test]
fn test_params_yaml() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "fountain.json", FOUNTAIN_JSON);
    particle_rs()
        .args(["params", "--seconds", "0.5", "--format", "yaml"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("name: emitter_time"))
        .stdout(predicate::str::contains("name: particle_count"));
}

#[test]
fn test_invalid_descriptor_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "bad.json", r#"{ "spawn_rate": -1 }"#);
    particle_rs()
        .arg("info")
        .arg(&path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("spawn rate must be positive"));
}

#[test]
fn test_missing_file_fails() {
    particle_rs()
        .args(["info", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read descriptor"));
}

#[test]
fn test_zero_fps_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_descriptor(&dir, "fountain.json", FOUNTAIN_JSON);
    particle_rs()
        .args(["simulate", "--fps", "0"])
        .arg(&path)
        .assert()
        .failure();
}

#[test]
fn test_completions() {
    particle_rs()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("particle-rs"));
}
