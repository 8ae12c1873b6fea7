//! Environment provisioning (`rnictl install`)
//!
//! The flow is a small state machine:
//!
//! ```text
//! Start -> CheckingRuntime -> EnsuringEnvironment -> [UpgradingInstaller]
//!       -> InstallingDependencies -> Done
//! ```
//!
//! Nothing on disk changes before the runtime check and the manifest load
//! have both succeeded. Everything after that runs under the environment
//! lock.

pub mod installer;

use std::fmt;
use std::time::Duration;

use crate::config::{Manifest, Project};
use crate::environment::{self, Environment, EnvironmentGuard, EnvironmentLayout, EnvironmentState};
use crate::error::{self, Result};
use crate::runtime::{self, RuntimePresence};
use crate::ui::Reporter;

/// Options for one provisioning run
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Remove an existing environment and create it from scratch
    pub recreate: bool,

    /// Install dependencies even when the manifest is unchanged
    pub reinstall: bool,

    /// Upgrade pip before installing
    pub upgrade_installer: bool,

    /// Pass `--quiet` to pip
    pub quiet: bool,
}

/// Provisioning state, logged on every transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProvisionState {
    Start,
    CheckingRuntime,
    EnsuringEnvironment,
    UpgradingInstaller,
    InstallingDependencies,
    Done,
}

impl fmt::Display for ProvisionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::CheckingRuntime => "checking-runtime",
            Self::EnsuringEnvironment => "ensuring-environment",
            Self::UpgradingInstaller => "upgrading-installer",
            Self::InstallingDependencies => "installing-dependencies",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// What a successful run did
#[derive(Debug, Clone)]
pub struct ProvisionReport {
    pub runtime: RuntimePresence,
    pub environment: Environment,

    /// The environment was created by this run
    pub created: bool,

    /// Dependencies were installed by this run (false on the fast path)
    pub installed: bool,

    /// Reason the pip self-upgrade failed, if it did
    pub upgrade_warning: Option<String>,
}

/// Drives one `install` run
pub struct Provisioner<'a> {
    project: &'a Project,
    options: InstallOptions,
    reporter: &'a mut dyn Reporter,
    state: ProvisionState,
}

impl<'a> Provisioner<'a> {
    pub fn new(project: &'a Project, options: InstallOptions, reporter: &'a mut dyn Reporter) -> Self {
        Self {
            project,
            options,
            reporter,
            state: ProvisionState::Start,
        }
    }

    #[cfg(test)]
    pub fn state(&self) -> ProvisionState {
        self.state
    }

    fn transition(&mut self, next: ProvisionState) {
        tracing::debug!(from = %self.state, to = %next, "provision state");
        self.state = next;
    }

    fn timeout(&self) -> Option<Duration> {
        self.project.config.install.timeout_secs.map(Duration::from_secs)
    }

    /// Run the whole flow
    pub fn run(&mut self) -> Result<ProvisionReport> {
        self.transition(ProvisionState::CheckingRuntime);
        let runtime = self.check_runtime()?;
        let manifest = Manifest::load(&self.project.manifest_path())?;

        self.transition(ProvisionState::EnsuringEnvironment);
        let layout = EnvironmentLayout::for_root(self.project.environment_root());
        let _guard = EnvironmentGuard::try_acquire(&layout)?;
        let (mut env, created) = self.ensure_environment(&runtime, &layout)?;

        if !self.options.reinstall && env.is_ready_for(manifest.fingerprint()) {
            self.reporter.success("Dependencies are up to date");
            self.transition(ProvisionState::Done);
            return Ok(ProvisionReport {
                runtime,
                environment: env,
                created,
                installed: false,
                upgrade_warning: None,
            });
        }

        let upgrade_warning = if self.options.upgrade_installer {
            self.transition(ProvisionState::UpgradingInstaller);
            self.upgrade_installer(&env)
        } else {
            None
        };

        self.transition(ProvisionState::InstallingDependencies);
        self.install_dependencies(&mut env, &manifest)?;

        self.transition(ProvisionState::Done);
        Ok(ProvisionReport {
            runtime,
            environment: env,
            created,
            installed: true,
            upgrade_warning,
        })
    }

    /// Check the configured runtime; fails before anything is written
    pub fn check_runtime(&mut self) -> Result<RuntimePresence> {
        let command = &self.project.config.runtime.command;
        self.reporter.step(&format!("Checking Python runtime ({command})"));
        let runtime = runtime::check_runtime(command)?;
        self.reporter.success(&format!(
            "Python {} at {}",
            runtime.version,
            runtime.executable.display()
        ));
        Ok(runtime)
    }

    /// Reuse, create or recreate the environment; caller holds the lock
    ///
    /// Returns the environment and whether it was created by this call.
    pub fn ensure_environment(
        &mut self,
        runtime: &RuntimePresence,
        layout: &EnvironmentLayout,
    ) -> Result<(Environment, bool)> {
        let root = layout.root();
        let state = environment::inspect(root);
        tracing::info!(root = %root.display(), %state, "environment inspected");

        match state {
            EnvironmentState::Created(marker) | EnvironmentState::Ready(marker)
                if !self.options.recreate =>
            {
                self.reporter
                    .success(&format!("Using existing environment {}", root.display()));
                return Ok((Environment::new(layout.clone(), marker), false));
            }
            EnvironmentState::Incomplete if !self.options.recreate => {
                environment::ensure_removable(root)?;
                return Err(error::environment::incomplete(root.display().to_string()));
            }
            EnvironmentState::Absent => {}
            _ => {
                environment::ensure_removable(root)?;
                self.reporter
                    .step(&format!("Removing environment {}", root.display()));
                environment::remove(root)?;
            }
        }

        self.reporter
            .spinner(&format!("Creating environment {}", root.display()));
        let result = installer::create_environment(runtime, layout, self.timeout());
        self.reporter.finish();
        let env = result?;

        self.reporter
            .success(&format!("Created environment {}", root.display()));
        Ok((env, true))
    }

    /// Best-effort pip self-upgrade; returns the failure reason
    pub fn upgrade_installer(&mut self, env: &Environment) -> Option<String> {
        self.reporter.spinner("Upgrading pip");
        let failure = installer::upgrade_installer(env, self.timeout());
        self.reporter.finish();

        if let Some(reason) = &failure {
            self.reporter
                .warn(&format!("Could not upgrade pip, continuing: {reason}"));
        }
        failure
    }

    /// Install the manifest and promote the marker to `ready`
    pub fn install_dependencies(&mut self, env: &mut Environment, manifest: &Manifest) -> Result<()> {
        // A failed install must not leave an older `ready` marker behind
        if env.marker().manifest_fingerprint.is_some() {
            let pending = env.marker().clone().pending();
            env.set_marker(pending)?;
        }

        if manifest.is_empty() {
            self.reporter.note(&format!(
                "{} lists no dependencies",
                manifest.path.display()
            ));
        } else {
            let names: Vec<String> = manifest.requirements().map(ToString::to_string).collect();
            self.reporter.step(&format!(
                "Installing dependencies from {}",
                manifest.path.display()
            ));
            if !names.is_empty() {
                self.reporter.note(&names.join(", "));
            }
            installer::install_dependencies(
                env,
                manifest,
                &self.project.root,
                self.options.quiet,
                self.timeout(),
            )?;
        }

        let ready = env.marker().clone().ready(manifest.fingerprint());
        env.set_marker(ready)?;
        self.reporter.success("Dependencies installed");
        Ok(())
    }
}
