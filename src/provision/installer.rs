//! Provisioning steps that shell out to the interpreter
//!
//! Each step runs one `python -m <module>` command. Creation and the pip
//! self-upgrade are captured (their output only matters on failure); the
//! dependency install streams pip's output to the operator verbatim.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use crate::config::Manifest;
use crate::environment::{CompletionMarker, Environment, EnvironmentLayout};
use crate::error::{self, Result};
use crate::process::{self, Completion};
use crate::runtime::RuntimePresence;

/// Create a fresh environment at `layout.root()` and mark it `created`
///
/// A root that did not exist before the attempt is removed again when
/// creation fails, so a failure leaves the environment absent.
pub fn create_environment(
    runtime: &RuntimePresence,
    layout: &EnvironmentLayout,
    timeout: Option<Duration>,
) -> Result<Environment> {
    let root = layout.root();
    let existed = root.exists();

    let mut cmd = runtime.module_command("venv");
    cmd.arg(root);

    let failure = match process::output(&mut cmd, timeout) {
        Ok(Completion::Finished(output)) if output.status.success() => None,
        Ok(Completion::Finished(output)) => Some(error::environment::creation_failed(
            root.display().to_string(),
            process::failure_reason(&output),
        )),
        Ok(Completion::TimedOut) => Some(error::deps::timed_out(
            "Environment creation",
            timeout.map_or(0, |t| t.as_secs()),
        )),
        Err(e) => Some(error::environment::creation_failed(
            root.display().to_string(),
            format!("failed to run {}: {e}", process::describe(&cmd)),
        )),
    };

    let failure = failure.or_else(|| {
        (!layout.has_interpreter()).then(|| {
            error::environment::creation_failed(
                root.display().to_string(),
                format!("no interpreter at {}", layout.python().display()),
            )
        })
    });

    if let Some(err) = failure {
        if !existed {
            discard_partial(root);
        }
        return Err(err);
    }

    let marker = CompletionMarker::created(&runtime.version);
    marker.write(root)?;
    tracing::info!(root = %root.display(), "environment created");
    Ok(Environment::new(layout.clone(), marker))
}

/// Best-effort `pip install --upgrade pip`
///
/// Returns the failure reason instead of an error; the caller warns and
/// carries on.
pub fn upgrade_installer(env: &Environment, timeout: Option<Duration>) -> Option<String> {
    let mut cmd = env_python(env);
    cmd.args([
        "-m",
        "pip",
        "install",
        "--upgrade",
        "pip",
        "--disable-pip-version-check",
        "--quiet",
    ]);

    let reason = match process::output(&mut cmd, timeout) {
        Ok(Completion::Finished(output)) if output.status.success() => return None,
        Ok(Completion::Finished(output)) => process::failure_reason(&output),
        Ok(Completion::TimedOut) => "timed out".to_string(),
        Err(e) => e.to_string(),
    };
    tracing::warn!(%reason, "pip self-upgrade failed");
    Some(reason)
}

/// `pip install -r <manifest>` with inherited stdio
///
/// Runs from `workdir` so relative paths inside the manifest resolve
/// against the project.
pub fn install_dependencies(
    env: &Environment,
    manifest: &Manifest,
    workdir: &Path,
    quiet: bool,
    timeout: Option<Duration>,
) -> Result<()> {
    let manifest_display = manifest.path.display().to_string();

    let mut cmd = env_python(env);
    cmd.args(["-m", "pip", "install", "--disable-pip-version-check"]);
    if quiet {
        cmd.arg("--quiet");
    }
    cmd.arg("-r").arg(&manifest.path).current_dir(workdir);

    match process::status(&mut cmd, timeout) {
        Ok(Completion::Finished(status)) if status.success() => Ok(()),
        Ok(Completion::Finished(status)) => Err(error::deps::install_failed(
            manifest_display,
            format!("pip exited with status {}", process::exit_code(status)),
        )),
        Ok(Completion::TimedOut) => Err(error::deps::timed_out(
            "Dependency installation",
            timeout.map_or(0, |t| t.as_secs()),
        )),
        Err(e) => Err(error::deps::install_failed(
            manifest_display,
            format!("failed to run {}: {e}", process::describe(&cmd)),
        )),
    }
}

fn env_python(env: &Environment) -> Command {
    Command::new(env.layout().python())
}

/// Remove a root this run created; it may not look like a venv yet
fn discard_partial(root: &Path) {
    if let Err(e) = std::fs::remove_dir_all(root) {
        tracing::warn!(root = %root.display(), error = %e, "failed to remove partial environment");
    }
}
