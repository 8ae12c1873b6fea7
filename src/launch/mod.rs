//! Application launch (`rnictl start`)
//!
//! ```text
//! Start -> VerifyingEnvironment -> Launching -> Running -> ChildExited | Interrupted
//! ```
//!
//! [`Launcher::prepare`] verifies the environment before anything else, and a
//! [`Launcher`] only ever holds a [`ProvisionedEnvironment`]. The launcher
//! never creates or repairs an environment.

pub mod port;
pub mod supervise;

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

pub use port::{DEFAULT_BIND_ADDRESS, ensure_port_free, is_port_free};
pub use supervise::{Interrupts, ProcessHandle, SessionOutcome, supervise};

use crate::config::Project;
use crate::environment::ProvisionedEnvironment;
use crate::error::{self, Result};
use crate::process;

/// Launch state, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchState {
    Start,
    VerifyingEnvironment,
    Launching,
    Running,
    ChildExited,
    Interrupted,
}

impl fmt::Display for LaunchState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::VerifyingEnvironment => "verifying-environment",
            Self::Launching => "launching",
            Self::Running => "running",
            Self::ChildExited => "child-exited",
            Self::Interrupted => "interrupted",
        };
        f.write_str(name)
    }
}

/// How to start the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Absolute path of the application script
    pub entry: PathBuf,
    pub port: u16,
    /// Bind address passed to the server; the port check uses `0.0.0.0` when unset
    pub address: Option<String>,
    /// Module run with `python -m` (e.g. "streamlit")
    pub framework: String,
    pub headless: bool,
    pub extra_args: Vec<String>,
    pub shutdown_grace: Duration,
}

impl LaunchConfig {
    pub fn from_project(project: &Project) -> Self {
        let launch = &project.config.launch;
        Self {
            entry: project.entry_path(),
            port: launch.port,
            address: launch.address.clone(),
            framework: launch.framework.clone(),
            headless: launch.headless,
            extra_args: launch.extra_args.clone(),
            shutdown_grace: Duration::from_secs(launch.shutdown_grace_secs),
        }
    }

    /// Address the port check binds
    pub fn bind_address(&self) -> &str {
        self.address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS)
    }

    /// Directory the server runs in (the entry file's directory)
    pub fn working_dir(&self) -> &Path {
        self.entry.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Starts and supervises the application in a provisioned environment
pub struct Launcher {
    env: ProvisionedEnvironment,
    config: LaunchConfig,
    state: LaunchState,
}

impl Launcher {
    /// Verify the environment at `root` is `Ready` and prepare to launch from it
    pub fn prepare(root: &Path, config: LaunchConfig) -> Result<Self> {
        log_transition(LaunchState::Start, LaunchState::VerifyingEnvironment);
        let env = ProvisionedEnvironment::verify(root)?;
        tracing::debug!(
            root = %env.root().display(),
            runtime = %env.marker().runtime_version,
            "environment verified"
        );
        Ok(Self::new(env, config))
    }

    fn new(env: ProvisionedEnvironment, config: LaunchConfig) -> Self {
        Self {
            env,
            config,
            state: LaunchState::VerifyingEnvironment,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> LaunchState {
        self.state
    }

    fn transition(&mut self, next: LaunchState) {
        log_transition(self.state, next);
        self.state = next;
    }

    /// Server command with the environment's activation applied
    pub fn command(&self) -> Command {
        let layout = self.env.layout();
        let config = &self.config;

        let mut cmd = Command::new(layout.python());
        cmd.arg("-m")
            .arg(&config.framework)
            .arg("run")
            .arg(&config.entry)
            .arg("--server.port")
            .arg(config.port.to_string());
        if let Some(address) = &config.address {
            cmd.arg("--server.address").arg(address);
        }
        if config.headless {
            cmd.arg("--server.headless").arg("true");
        }
        cmd.args(&config.extra_args);

        cmd.env("VIRTUAL_ENV", self.env.root())
            .env("PATH", activated_path(&layout.bin_dir()))
            .env_remove("PYTHONHOME")
            .current_dir(config.working_dir());
        cmd
    }

    /// Check everything that must hold before spawning
    pub fn preflight(&self) -> Result<()> {
        if !self.config.entry.is_file() {
            return Err(error::launch::entry_not_found(
                self.config.entry.display().to_string(),
            ));
        }
        ensure_port_free(self.config.bind_address(), self.config.port)
    }

    /// Spawn the server after the preflight checks
    pub fn launch(&mut self) -> Result<ProcessHandle> {
        self.transition(LaunchState::Launching);
        self.preflight()?;

        let mut cmd = self.command();
        let described = process::describe(&cmd);
        tracing::info!(command = %described, cwd = %self.config.working_dir().display(), "starting server");

        let child = cmd
            .spawn()
            .map_err(|e| error::launch::failed(described.clone(), e.to_string()))?;

        self.transition(LaunchState::Running);
        Ok(ProcessHandle::new(child, described))
    }

    /// Launch and block until the server exits or the operator interrupts
    pub fn run(&mut self, interrupts: &Interrupts) -> Result<SessionOutcome> {
        let mut handle = self.launch()?;
        let outcome = supervise(&mut handle, interrupts, self.config.shutdown_grace)
            .map_err(|e| error::fs::io_error(format!("Failed to wait for server: {e}")))?;

        match outcome {
            SessionOutcome::Exited(status) => {
                self.transition(LaunchState::ChildExited);
                tracing::info!(code = process::exit_code(status), "server exited");
            }
            SessionOutcome::Interrupted(_) => self.transition(LaunchState::Interrupted),
        }
        Ok(outcome)
    }
}

fn log_transition(from: LaunchState, to: LaunchState) {
    tracing::debug!(%from, %to, "launch state");
}

/// `PATH` with `bin_dir` in front
fn activated_path(bin_dir: &Path) -> OsString {
    let mut paths = vec![bin_dir.to_path_buf()];
    if let Some(current) = std::env::var_os("PATH") {
        paths.extend(std::env::split_paths(&current));
    }
    std::env::join_paths(paths).unwrap_or_else(|_| bin_dir.as_os_str().to_os_string())
}
