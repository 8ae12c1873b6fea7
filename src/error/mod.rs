//! Error types and handling for rnictl
//!
//! Uses `thiserror` for error definitions and `miette` for pretty diagnostics.
//!
//! This module is organized into sub-modules by error domain:
//! - [`runtime`]: Runtime detection errors
//! - [`environment`]: Environment creation, locking and verification errors
//! - [`deps`]: Manifest and dependency installation errors
//! - [`launch`]: Application launch errors
//! - [`config`]: Configuration errors
//! - [`fs`]: File system errors

pub mod config;
pub mod deps;
pub mod environment;
pub mod fs;
pub mod launch;
pub mod runtime;

use miette::Diagnostic;
use thiserror::Error;

/// Main error type for rnictl operations
#[derive(Error, Diagnostic, Debug)]
pub enum RniError {
    // Runtime errors
    #[error("Python runtime '{runtime}' not found: {reason}")]
    #[diagnostic(
        code(rnictl::runtime::missing),
        help(
            "Install Python 3 (https://www.python.org/downloads/) and make sure it is on PATH, \
             or set runtime.command in rnictl.yaml"
        )
    )]
    PrerequisiteMissing { runtime: String, reason: String },

    // Environment errors
    #[error("Failed to create environment at {path}: {reason}")]
    #[diagnostic(
        code(rnictl::environment::creation_failed),
        help("Check that the project directory is writable and that the venv module is available")
    )]
    EnvironmentCreationFailed { path: String, reason: String },

    #[error("Environment at {path} is incomplete (no completion marker)")]
    #[diagnostic(
        code(rnictl::environment::incomplete),
        help(
            "A previous install was interrupted or the directory was not created by rnictl. \
             Run 'rnictl install --recreate' to rebuild it, or 'rnictl clean' to remove it"
        )
    )]
    EnvironmentIncomplete { path: String },

    #[error("Environment at {path} is not provisioned ({state})")]
    #[diagnostic(
        code(rnictl::environment::not_provisioned),
        help("Run 'rnictl install' first")
    )]
    EnvironmentNotProvisioned { path: String, state: String },

    #[error("Environment at {path} is locked by another rnictl process")]
    #[diagnostic(
        code(rnictl::environment::locked),
        help("Wait for the running 'rnictl install' or 'rnictl clean' to finish")
    )]
    EnvironmentLocked { path: String },

    #[error("Failed to lock environment: {reason}")]
    #[diagnostic(code(rnictl::environment::lock_failed))]
    EnvironmentLockFailed { reason: String },

    #[error("Completion marker {path} is unreadable: {reason}")]
    #[diagnostic(
        code(rnictl::environment::marker_corrupt),
        help("Run 'rnictl install --recreate' to rebuild the environment")
    )]
    MarkerCorrupt { path: String, reason: String },

    #[error("Refusing to remove {path}: it does not look like a Python environment")]
    #[diagnostic(
        code(rnictl::environment::unrecognized),
        help(
            "The directory has no pyvenv.cfg and no rnictl completion marker. \
             Check environment.path in rnictl.yaml, or remove the directory yourself"
        )
    )]
    EnvironmentUnrecognized { path: String },

    #[error("Refusing to remove {path} without confirmation")]
    #[diagnostic(
        code(rnictl::environment::confirmation_required),
        help("Pass --yes to remove the environment non-interactively")
    )]
    ConfirmationRequired { path: String },

    // Dependency errors
    #[error("Failed to install dependencies from {manifest}: {reason}")]
    #[diagnostic(
        code(rnictl::deps::install_failed),
        help(
            "Fix the problem reported by pip above and run 'rnictl install' again; \
             already installed packages are kept"
        )
    )]
    DependencyInstallFailed { manifest: String, reason: String },

    #[error("Dependency manifest not found: {path}")]
    #[diagnostic(
        code(rnictl::deps::manifest_not_found),
        help("Create requirements.txt or point 'manifest' in rnictl.yaml at your dependency list")
    )]
    ManifestNotFound { path: String },

    #[error("Failed to read dependency manifest {path}: {reason}")]
    #[diagnostic(code(rnictl::deps::manifest_read_failed))]
    ManifestReadFailed { path: String, reason: String },

    #[error("{step} did not finish within {secs}s")]
    #[diagnostic(
        code(rnictl::deps::timed_out),
        help("Raise install.timeout_secs in rnictl.yaml or remove it to wait indefinitely")
    )]
    InstallTimedOut { step: String, secs: u64 },

    // Launch errors
    #[error("Failed to launch '{command}': {reason}")]
    #[diagnostic(code(rnictl::launch::failed))]
    LaunchFailed { command: String, reason: String },

    #[error("Port {port} on {address} is already in use")]
    #[diagnostic(
        code(rnictl::launch::port_in_use),
        help("Stop the process bound to this port, or pick another one with --port")
    )]
    PortInUse { port: u16, address: String },

    #[error("Entry file not found: {path}")]
    #[diagnostic(
        code(rnictl::launch::entry_not_found),
        help("Set launch.entry in rnictl.yaml or pass --entry")
    )]
    EntryFileNotFound { path: String },

    // Configuration errors
    #[error("Configuration file not found: {path}")]
    #[diagnostic(code(rnictl::config::not_found))]
    ConfigNotFound { path: String },

    #[error("Failed to parse configuration file {path}: {reason}")]
    #[diagnostic(code(rnictl::config::parse_failed))]
    ConfigParseFailed { path: String, reason: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(rnictl::config::invalid))]
    ConfigInvalid { message: String },

    // File system errors
    #[error("Failed to read file {path}: {reason}")]
    #[diagnostic(code(rnictl::fs::read_failed))]
    FileReadFailed { path: String, reason: String },

    #[error("Failed to write file {path}: {reason}")]
    #[diagnostic(code(rnictl::fs::write_failed))]
    FileWriteFailed { path: String, reason: String },

    #[error("IO error: {message}")]
    #[diagnostic(code(rnictl::fs::io_error))]
    IoError { message: String },
}

impl From<std::io::Error> for RniError {
    fn from(err: std::io::Error) -> Self {
        RniError::IoError {
            message: err.to_string(),
        }
    }
}

impl From<serde_yaml::Error> for RniError {
    fn from(err: serde_yaml::Error) -> Self {
        RniError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for RniError {
    fn from(err: serde_json::Error) -> Self {
        RniError::ConfigParseFailed {
            path: "unknown".to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<inquire::InquireError> for RniError {
    fn from(err: inquire::InquireError) -> Self {
        RniError::IoError {
            message: err.to_string(),
        }
    }
}

/// Result type alias using miette for error handling
pub type Result<T> = miette::Result<T, RniError>;
