//! Test fixtures shared by unit tests.
//!
//! The fake runtime is a POSIX shell script standing in for `python3`. It
//! answers `--version`, emulates `-m venv` by copying itself into the new
//! environment, and records every `-m <module>` call in `state/calls.log`.
//! Behaviour is switched by files in the state directory:
//!
//! - `version-fail`: `--version` exits 1
//! - `venv-fail`: `-m venv` exits 1 with an error on stderr
//! - `upgrade-fail`: `-m pip install --upgrade pip` exits 1
//! - `pip-fail`: any other `-m pip` call exits 1
//! - `server-mode`: `exit <n>` or `serve` for `-m streamlit`
//!
//! ```ignore
//! let (temp, python) = create_fake_runtime();
//! let project = create_project(temp.path(), &python);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::config::{Project, ProjectConfig};

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
                    ;;
            esac
            exit 0
            ;;
        streamlit)
            echo $$ > "$STATE/server.pid"
            echo "VIRTUAL_ENV=$VIRTUAL_ENV" >> "$STATE/server.env"
            echo "PWD=$(pwd)" >> "$STATE/server.env"
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

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

/// Write an executable shell script into `dir`
///
/// # Panics
///
/// Panics if the script cannot be written.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    let content = if body.starts_with("#!") {
        body.to_string()
    } else {
        format!("#!/bin/sh\n{body}")
    };
    fs::write(&path, content).expect("Failed to write script");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make script executable");
    }

    path
}

/// Create a fake `python3` with its state directory
///
/// Returns the temp dir (state lives in `<temp>/state`) and the script path.
///
/// # Panics
///
/// Panics if the fixture cannot be written.
#[must_use]
pub fn create_fake_runtime() -> (TempDir, PathBuf) {
    let temp = create_temp_dir();
    let state = temp.path().join("state");
    fs::create_dir_all(&state).expect("Failed to create state directory");

    let body = FAKE_RUNTIME.replace("__STATE__", &state.display().to_string());
    let python = write_script(temp.path(), "python3", &body);
    (temp, python)
}

/// State directory of a fake runtime created by [`create_fake_runtime`]
pub fn state_dir(temp: &TempDir) -> PathBuf {
    temp.path().join("state")
}

/// Switch fake runtime behaviour by creating a flag file
///
/// # Panics
///
/// Panics if the flag file cannot be written.
pub fn set_flag(temp: &TempDir, flag: &str, content: &str) {
    fs::write(state_dir(temp).join(flag), content).expect("Failed to write flag");
}

/// Calls recorded by the fake runtime, one per line
pub fn calls(temp: &TempDir) -> Vec<String> {
    fs::read_to_string(state_dir(temp).join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Create a project in `<temp>/project` using `python` as its runtime
///
/// The manifest lists `streamlit` and `pandas` and the entry file exists.
///
/// # Panics
///
/// Panics if the project cannot be written.
pub fn create_project(temp: &Path, python: &Path) -> Project {
    let root = temp.join("project");
    fs::create_dir_all(&root).expect("Failed to create project directory");
    fs::write(root.join("requirements.txt"), "streamlit\npandas\n")
        .expect("Failed to write manifest");
    fs::write(root.join("rni_app_v3.2.py"), "import streamlit as st\n")
        .expect("Failed to write entry file");

    let mut config = ProjectConfig::default();
    config.runtime.command = python.display().to_string();
    Project::with_config(root, config)
}
