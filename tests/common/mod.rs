//! Common test utilities for rnictl integration tests
//!
//! A [`TestProject`] is a temp directory holding an app project and a fake
//! `python3`. The fake answers `--version`, emulates `-m venv` by copying
//! itself into the new environment, and logs every `-m <module>` call to
//! `state/calls.log`. Flag files in `state/` switch its behaviour.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use assert_cmd::Command;
use tempfile::TempDir;

const FAKE_RUNTIME: &str = r#"#!/bin/sh
STATE="__STATE__"
log() { echo "$*" >> "$STATE/calls.log"; }

if [ "$1" = "--version" ]; then
    [ -f "$STATE/version-fail" ] && exit 1
    echo "Python 3.11.4"
    exit 0
fi

if [ "$1" = "-m" ]; then
    module="$2"
    shift 2
    log "$module $*"
    case "$module" in
        venv)
            if [ -f "$STATE/venv-fail" ]; then
                echo "Error: ensurepip is not available" >&2
                exit 1
            fi
            mkdir -p "$1/bin"
            cp "$0" "$1/bin/python"
            : > "$1/bin/activate"
            echo "home = $(dirname "$0")" > "$1/pyvenv.cfg"
            exit 0
            ;;
        pip)
            case "$*" in
                *--upgrade*) [ -f "$STATE/upgrade-fail" ] && exit 1 ;;
                *)
                    if [ -f "$STATE/pip-fail" ]; then
                        echo "ERROR: No matching distribution found for nosuchpkg" >&2
                        exit 1
                    fi
                    echo "Successfully installed (fake)"
                    ;;
            esac
            exit 0
            ;;
        streamlit)
            echo $$ > "$STATE/server.pid"
            echo "VIRTUAL_ENV=$VIRTUAL_ENV" >> "$STATE/server.env"
            echo "PWD=$(pwd)" >> "$STATE/server.env"
            echo "ARGS=$*" >> "$STATE/server.env"
            mode="exit 0"
            [ -f "$STATE/server-mode" ] && mode=$(cat "$STATE/server-mode")
            case "$mode" in
                serve) exec sleep 60 ;;
                "exit "*) exit "${mode#exit }" ;;
            esac
            ;;
    esac
fi
exit 0
"#;

/// rnictl binary with developer overrides removed
#[allow(deprecated)]
pub fn rnictl_cmd() -> Command {
    let mut cmd = Command::cargo_bin("rnictl").unwrap();
    for var in ["RNICTL_PROJECT", "RNICTL_CONFIG", "RNICTL_PORT", "RNICTL_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

/// Path to the rnictl binary, for tests that manage the process themselves
#[allow(deprecated)]
pub fn rnictl_bin() -> PathBuf {
    assert_cmd::cargo::cargo_bin("rnictl")
}

/// A project directory plus a fake Python runtime
pub struct TestProject {
    pub temp: TempDir,
    /// Project root (holds requirements.txt, the entry file and rnictl.yaml)
    pub path: PathBuf,
    /// Fake `python3`
    pub python: PathBuf,
}

impl TestProject {
    /// Create a project whose `rnictl.yaml` points at the fake runtime
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let base = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp dir");

        let state = base.join("state");
        std::fs::create_dir_all(&state).expect("Failed to create state directory");
        let bin = base.join("bin");
        std::fs::create_dir_all(&bin).expect("Failed to create bin directory");
        let python = bin.join("python3");
        write_executable(
            &python,
            &FAKE_RUNTIME.replace("__STATE__", &state.display().to_string()),
        );

        let path = base.join("project");
        std::fs::create_dir_all(&path).expect("Failed to create project directory");

        let project = Self { temp, path, python };
        project.write_file("requirements.txt", "streamlit\npandas\n");
        project.write_file("rni_app_v3.2.py", "import streamlit as st\n");
        project.write_config("");
        project
    }

    /// Write `rnictl.yaml`: the fake runtime plus `extra` YAML
    pub fn write_config(&self, extra: &str) {
        let config = format!(
            "runtime:\n  command: {}\n{extra}",
            self.python.display()
        );
        self.write_file("rnictl.yaml", &config);
    }

    /// rnictl command running in the project directory
    pub fn cmd(&self) -> Command {
        let mut cmd = rnictl_cmd();
        cmd.current_dir(&self.path);
        cmd
    }

    /// Write a file in the project
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Check if a file exists in the project
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    pub fn env_root(&self) -> PathBuf {
        self.path.join("venv")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.path.parent().expect("project has a parent").join("state")
    }

    /// Switch fake runtime behaviour
    pub fn set_flag(&self, flag: &str, content: &str) {
        std::fs::write(self.state_dir().join(flag), content).expect("Failed to write flag");
    }

    /// `-m <module>` calls seen by the fake runtime
    pub fn calls(&self) -> Vec<String> {
        std::fs::read_to_string(self.state_dir().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Number of `pip install -r` runs
    pub fn dependency_installs(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| c.starts_with("pip install") && c.contains("-r "))
            .count()
    }

    /// Number of `venv` runs
    pub fn environment_creations(&self) -> usize {
        self.calls().iter().filter(|c| c.starts_with("venv ")).count()
    }

    /// What the fake server recorded (`KEY=value` lines)
    pub fn server_env(&self) -> String {
        std::fs::read_to_string(self.state_dir().join("server.env")).unwrap_or_default()
    }

    /// Completion marker contents, if any
    pub fn marker(&self) -> Option<serde_json::Value> {
        let content = std::fs::read_to_string(self.env_root().join(".rnictl-complete.json")).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Run `rnictl install` and assert it succeeds
    pub fn install(&self) {
        self.cmd().args(["install", "-q"]).assert().success();
    }

    /// Wait until the fake server has written its pid
    pub fn wait_for_server_pid(&self, timeout: Duration) -> Option<u32> {
        let path = self.state_dir().join("server.pid");
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Some(pid) = std::fs::read_to_string(&path)
                .ok()
                .and_then(|s| s.trim().parse().ok())
            {
                return Some(pid);
            }
            std::thread::sleep(Duration::from_millis(50));
        }
        None
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// A port nothing listens on right now
pub fn free_port() -> u16 {
    std::net::TcpListener::bind(("127.0.0.1", 0))
        .expect("Failed to bind port listener")
        .local_addr()
        .expect("Port listener has no address")
        .port()
}

fn write_executable(path: &Path, content: &str) {
    std::fs::write(path, content).expect("Failed to write script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_creation() {
        let project = TestProject::new();
        assert!(project.file_exists("requirements.txt"));
        assert!(project.file_exists("rni_app_v3.2.py"));
        assert!(project.file_exists("rnictl.yaml"));
        assert!(project.calls().is_empty());
    }
}
