//! Status and clean command tests

#![cfg(unix)]

mod common;

use common::TestProject;
use predicates::prelude::*;

fn status_json(project: &TestProject) -> serde_json::Value {
    let output = project
        .cmd()
        .args(["status", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_status_before_install() {
    let project = TestProject::new();
    let status = status_json(&project);

    assert_eq!(status["runtime"]["present"], true);
    assert_eq!(status["runtime"]["version"], "3.11.4");
    assert_eq!(status["environment"]["state"], "absent");
    assert_eq!(status["manifest"]["requirements"], 2);
    assert_eq!(status["manifest"]["up_to_date"], false);
    assert_eq!(status["entry"]["present"], true);
    assert_eq!(status["port"]["port"], 8501);

    // Read-only
    assert!(!project.env_root().exists());
    assert!(!project.file_exists(".venv.lock"));
    assert!(project.calls().is_empty());
}

#[test]
fn test_status_after_install() {
    let project = TestProject::new();
    project.install();

    let status = status_json(&project);
    assert_eq!(status["environment"]["state"], "ready");
    assert_eq!(status["environment"]["runtime_version"], "3.11.4");
    assert_eq!(status["manifest"]["up_to_date"], true);
    assert_eq!(
        status["environment"]["manifest_fingerprint"],
        status["manifest"]["fingerprint"]
    );
}

#[test]
fn test_status_reports_manifest_drift() {
    let project = TestProject::new();
    project.install();
    project.write_file("requirements.txt", "streamlit\n");

    let status = status_json(&project);
    assert_eq!(status["environment"]["state"], "ready");
    assert_eq!(status["manifest"]["up_to_date"], false);
}

#[test]
fn test_status_missing_runtime_still_succeeds() {
    let project = TestProject::new();
    project.set_flag("version-fail", "");

    let status = status_json(&project);
    assert_eq!(status["runtime"]["present"], false);
    assert!(status["runtime"]["error"].as_str().unwrap().contains("not found"));
}

#[test]
fn test_status_human_output() {
    let project = TestProject::new();
    project
        .cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Runtime:"))
        .stdout(predicate::str::contains("Python 3.11.4"))
        .stdout(predicate::str::contains("Environment:"))
        .stdout(predicate::str::contains("absent"))
        .stdout(predicate::str::contains("Port:"));
}

#[test]
fn test_clean_with_yes() {
    let project = TestProject::new();
    project.install();

    project
        .cmd()
        .args(["clean", "--yes"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Removed environment"));
    assert!(!project.env_root().exists());

    // The next install starts from scratch
    project.install();
    assert_eq!(project.environment_creations(), 2);
}

#[test]
fn test_clean_requires_confirmation_without_tty() {
    let project = TestProject::new();
    project.install();

    project
        .cmd()
        .arg("clean")
        .assert()
        .failure()
        .stderr(predicate::str::contains("without confirmation"));
    assert!(project.env_root().exists());
}

#[test]
fn test_clean_without_environment() {
    let project = TestProject::new();
    project
        .cmd()
        .args(["clean", "-y"])
        .assert()
        .success()
        .stderr(predicate::str::contains("No environment"));
}

#[test]
fn test_clean_removes_incomplete_environment() {
    let project = TestProject::new();
    project.write_file("venv/pyvenv.cfg", "home = /usr/bin\n");
    project.write_file("venv/lib/leftover.txt", "partial");

    project.cmd().args(["clean", "-y"]).assert().success();
    assert!(!project.env_root().exists());
    project.install();
}

#[test]
fn test_clean_keeps_directory_that_is_not_an_environment() {
    let project = TestProject::new();
    project.write_config("environment:\n  path: data\n");
    project.write_file("data/rni.db", "measurements");

    project
        .cmd()
        .args(["clean", "-y"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Refusing to remove"))
        .stderr(predicate::str::contains("environment.path"));
    assert!(project.file_exists("data/rni.db"));
}

#[test]
fn test_clean_removes_empty_directory() {
    let project = TestProject::new();
    std::fs::create_dir_all(project.env_root()).unwrap();

    project.cmd().args(["clean", "-y"]).assert().success();
    assert!(!project.env_root().exists());
}
