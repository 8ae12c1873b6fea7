//! Manifest and dependency installation errors

use super::RniError;

/// Creates a dependency install failed error
pub fn install_failed(manifest: impl Into<String>, reason: impl Into<String>) -> RniError {
    RniError::DependencyInstallFailed {
        manifest: manifest.into(),
        reason: reason.into(),
    }
}

/// Creates a manifest not found error
pub fn manifest_not_found(path: impl Into<String>) -> RniError {
    RniError::ManifestNotFound { path: path.into() }
}

/// Creates a manifest read failed error
pub fn manifest_read_failed(path: impl Into<String>, reason: impl Into<String>) -> RniError {
    RniError::ManifestReadFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates a timeout error for an installer step
pub fn timed_out(step: impl Into<String>, secs: u64) -> RniError {
    RniError::InstallTimedOut {
        step: step.into(),
        secs,
    }
}
