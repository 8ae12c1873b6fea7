//! Status command implementation
//!
//! Read-only: nothing is created, locked or installed. The command exits 0
//! whatever it finds; problems are reported, not raised.

use std::path::PathBuf;

use console::Style;
use serde::Serialize;

use crate::cli::StatusArgs;
use crate::commands::helpers::{self, Context};
use crate::config::{Manifest, Project};
use crate::environment::{self, EnvironmentState};
use crate::error::Result;
use crate::launch::{LaunchConfig, is_port_free};
use crate::runtime;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub project: PathBuf,
    pub runtime: RuntimeStatus,
    pub environment: EnvironmentStatus,
    pub manifest: ManifestStatus,
    pub entry: EntryStatus,
    pub port: PortStatus,
}

#[derive(Debug, Serialize)]
pub struct RuntimeStatus {
    pub command: String,
    pub present: bool,
    pub version: Option<String>,
    pub executable: Option<PathBuf>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnvironmentStatus {
    pub path: PathBuf,
    pub state: String,
    pub runtime_version: Option<String>,
    pub manifest_fingerprint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ManifestStatus {
    pub path: PathBuf,
    pub present: bool,
    pub fingerprint: Option<String>,
    pub requirements: usize,
    /// Whether a `ready` environment was installed from this exact manifest
    pub up_to_date: bool,
}

#[derive(Debug, Serialize)]
pub struct EntryStatus {
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Serialize)]
pub struct PortStatus {
    pub port: u16,
    pub address: String,
    pub free: bool,
}

/// Gather the status of `project`
pub fn collect(project: &Project) -> StatusReport {
    let command = project.config.runtime.command.clone();
    let runtime = match runtime::check_runtime(&command) {
        Ok(presence) => RuntimeStatus {
            command,
            present: true,
            version: Some(presence.version),
            executable: Some(presence.executable),
            error: None,
        },
        Err(e) => RuntimeStatus {
            command,
            present: false,
            version: None,
            executable: None,
            error: Some(e.to_string()),
        },
    };

    let env_root = project.environment_root();
    let state = environment::inspect(&env_root);
    let marker = state.marker();
    let environment = EnvironmentStatus {
        path: env_root.clone(),
        state: state.name().to_string(),
        runtime_version: marker.map(|m| m.runtime_version.clone()),
        manifest_fingerprint: marker.and_then(|m| m.manifest_fingerprint.clone()),
    };

    let manifest_path = project.manifest_path();
    let manifest = match Manifest::load(&manifest_path) {
        Ok(manifest) => ManifestStatus {
            path: manifest_path,
            present: true,
            fingerprint: Some(manifest.fingerprint().to_string()),
            requirements: manifest.requirements().count(),
            up_to_date: matches!(&state, EnvironmentState::Ready(m)
                if m.manifest_fingerprint.as_deref() == Some(manifest.fingerprint())),
        },
        Err(_) => ManifestStatus {
            path: manifest_path,
            present: false,
            fingerprint: None,
            requirements: 0,
            up_to_date: false,
        },
    };

    let launch = LaunchConfig::from_project(project);
    let entry = EntryStatus {
        present: launch.entry.is_file(),
        path: launch.entry.clone(),
    };
    let port = PortStatus {
        port: launch.port,
        address: launch.bind_address().to_string(),
        free: is_port_free(launch.bind_address(), launch.port),
    };

    StatusReport {
        project: project.root.clone(),
        runtime,
        environment,
        manifest,
        entry,
        port,
    }
}

/// Run status command
pub fn run(ctx: &Context, args: StatusArgs) -> Result<()> {
    let project = helpers::open_project(ctx)?;
    let report = collect(&project);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &StatusReport) {
    let label = Style::new().bold();
    let good = Style::new().green();
    let bad = Style::new().yellow();
    let mark = |ok: bool, text: &str| {
        if ok {
            good.apply_to(text.to_string())
        } else {
            bad.apply_to(text.to_string())
        }
    };

    println!("{} {}", label.apply_to("Project:"), report.project.display());

    let runtime = &report.runtime;
    match (&runtime.version, &runtime.executable) {
        (Some(version), Some(executable)) => println!(
            "{} {} ({})",
            label.apply_to("Runtime:"),
            mark(true, &format!("Python {version}")),
            executable.display()
        ),
        _ => println!(
            "{} {}",
            label.apply_to("Runtime:"),
            mark(
                false,
                runtime.error.as_deref().unwrap_or("not found")
            )
        ),
    }

    let env = &report.environment;
    println!(
        "{} {} ({})",
        label.apply_to("Environment:"),
        mark(env.state == "ready", &env.state),
        env.path.display()
    );

    let manifest = &report.manifest;
    if manifest.present {
        let freshness = if manifest.up_to_date {
            mark(true, "installed")
        } else {
            mark(false, "not installed")
        };
        println!(
            "{} {} ({} requirements, {})",
            label.apply_to("Manifest:"),
            manifest.path.display(),
            manifest.requirements,
            freshness
        );
    } else {
        println!(
            "{} {} ({})",
            label.apply_to("Manifest:"),
            manifest.path.display(),
            mark(false, "missing")
        );
    }

    println!(
        "{} {} ({})",
        label.apply_to("Entry:"),
        report.entry.path.display(),
        mark(report.entry.present, if report.entry.present { "found" } else { "missing" })
    );

    let port = &report.port;
    println!(
        "{} {}:{} ({})",
        label.apply_to("Port:"),
        port.address,
        port.port,
        mark(port.free, if port.free { "free" } else { "in use" })
    );
}
