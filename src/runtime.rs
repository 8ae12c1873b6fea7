//! Python runtime detection
//!
//! Presence is never cached: every run resolves the configured command and
//! asks it for its version.

use std::path::PathBuf;
use std::process::Command;

use crate::error::{self, Result};
use crate::process::{self, Completion};

/// Oldest interpreter line that ships the `venv` module
const MIN_MAJOR: u32 = 3;

/// A runtime that answered its version query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimePresence {
    /// Command as configured (e.g. "python3")
    pub command: String,

    /// Resolved executable
    pub executable: PathBuf,

    /// Reported version (e.g. "3.11.4")
    pub version: String,
}

impl RuntimePresence {
    /// Command that runs `-m <module>` with this interpreter
    pub fn module_command(&self, module: &str) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg("-m").arg(module);
        cmd
    }
}

/// Run `command --version`
///
/// Resolution failures, spawn failures, non-zero exits and unparseable
/// output all count as an absent runtime.
pub fn check_runtime(command: &str) -> Result<RuntimePresence> {
    let executable = which::which(command)
        .map_err(|e| error::runtime::missing(command, format!("not found on PATH ({e})")))?;

    let mut query = Command::new(&executable);
    query.arg("--version");

    let output = match process::output(&mut query, None) {
        Ok(Completion::Finished(output)) => output,
        Ok(Completion::TimedOut) => {
            return Err(error::runtime::missing(command, "version check timed out"));
        }
        Err(e) => {
            return Err(error::runtime::missing(
                command,
                format!("failed to execute {}: {e}", executable.display()),
            ));
        }
    };

    if !output.status.success() {
        return Err(error::runtime::missing(
            command,
            format!("'{command} --version' {}", process::failure_reason(&output)),
        ));
    }

    // Python 2 prints its version on stderr
    let text = format!(
        "{}\n{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    let version = parse_version(&text).ok_or_else(|| {
        error::runtime::missing(command, format!("unrecognized version output: {}", text.trim()))
    })?;

    let major = version
        .split('.')
        .next()
        .and_then(|m| m.parse::<u32>().ok())
        .unwrap_or(0);
    if major < MIN_MAJOR {
        return Err(error::runtime::missing(
            command,
            format!("Python {MIN_MAJOR} is required, found {version}"),
        ));
    }

    tracing::info!(executable = %executable.display(), %version, "runtime present");
    Ok(RuntimePresence {
        command: command.to_string(),
        executable,
        version,
    })
}

/// Extract a dotted version number from `--version` output
///
/// Accepts `Python 3.11.4`, `Python 3.13.0rc1` and bare `3.12.1`.
pub fn parse_version(text: &str) -> Option<String> {
    text.split_whitespace().find_map(|token| {
        let numeric: String = token
            .chars()
            .take_while(|c| c.is_ascii_digit() || *c == '.')
            .collect();
        let numeric = numeric.trim_end_matches('.');
        let mut parts = numeric.split('.');
        let major = parts.next()?;
        let minor = parts.next()?;
        (!major.is_empty() && !minor.is_empty()).then(|| numeric.to_string())
    })
}
