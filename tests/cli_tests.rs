//! End-to-end tests of the `nodelaunch` binary.

use std::fs;

use assert_cmd::Command;
use nodelaunch::testkit::config::toml;
use predicates::prelude::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("nodelaunch.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn nodelaunch() -> Command {
    let mut cmd = Command::cargo_bin("nodelaunch").expect("binary built");
    cmd.env_remove("RUST_LOG").arg("--color").arg("never");
    cmd
}

#[test]
fn config_validate_accepts_valid_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &toml(&["a", "b"], 2));

    nodelaunch()
        .args(["config", "validate", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn config_validate_rejects_zero_nodes() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[launch]\nnode_count = 0\n[session]\napp = \"true\"\n");

    nodelaunch()
        .args(["config", "validate", "-c"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("launch.node_count"));
}

#[test]
fn config_show_prints_json_lines() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &toml(&["a", "b"], 2));

    nodelaunch()
        .args(["--json", "config", "show", "-c"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"type\":\"config\""))
        .stdout(predicate::str::contains("\"node_count\":2"));
}

#[test]
fn missing_config_file_fails() {
    nodelaunch()
        .args(["run", "-c", "/nonexistent/nodelaunch.toml"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to read config file"));
}

#[test]
fn run_succeeds_after_retry_and_writes_netconf() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &toml(&["a", "bad", "b", "c"], 3));
    let netconf = dir.path().join("netconf.json");

    nodelaunch()
        .args(["run", "-c"])
        .arg(&path)
        .arg("--netconf-out")
        .arg(&netconf)
        .assert()
        .success()
        .stdout(predicate::str::contains("Launch completed"));

    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&netconf).unwrap()).unwrap();
    assert_eq!(written["1"]["state"], "down");
    assert_eq!(written["0"]["state"], "idle");
    assert!(written.get("frontend").is_some());
}

#[test]
fn run_reports_not_enough_resources() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &toml(&["a", "bad", "c"], 3));

    nodelaunch()
        .args(["run", "-c"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "There are not enough hardware resources available for continued app execution.",
        ));
}

#[test]
fn run_reports_no_resources_left_in_exhaust_mode() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &toml(&["bad", "bad"], 1));

    nodelaunch()
        .args(["run", "--exhaust-resources", "-c"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "There are no more hardware resources available for continued app execution.",
        ));
}

#[test]
fn run_flags_override_config() {
    let dir = TempDir::new().unwrap();
    // Two nodes requested of three hosts: one failure still leaves a spare.
    let path = write_config(&dir, &toml(&["a", "bad", "c"], 3));

    nodelaunch()
        .args(["run", "--nodes", "2", "-c"])
        .arg(&path)
        .assert()
        .success();
}

#[test]
fn max_attempts_flag_limits_retries() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &toml(&["bad", "bad", "bad", "a"], 1));

    nodelaunch()
        .args(["run", "--max-attempts", "2", "-c"])
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("after 2 attempts"));
}
