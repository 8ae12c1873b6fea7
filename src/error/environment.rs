//! Environment errors

use super::RniError;

/// Creates an environment creation failed error
pub fn creation_failed(path: impl Into<String>, reason: impl Into<String>) -> RniError {
    RniError::EnvironmentCreationFailed {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an incomplete environment error
pub fn incomplete(path: impl Into<String>) -> RniError {
    RniError::EnvironmentIncomplete { path: path.into() }
}

/// Creates an environment not provisioned error
pub fn not_provisioned(path: impl Into<String>, state: impl Into<String>) -> RniError {
    RniError::EnvironmentNotProvisioned {
        path: path.into(),
        state: state.into(),
    }
}

/// Creates an environment locked error
pub fn locked(path: impl Into<String>) -> RniError {
    RniError::EnvironmentLocked { path: path.into() }
}

/// Creates a lock failed error
pub fn lock_failed(reason: impl Into<String>) -> RniError {
    RniError::EnvironmentLockFailed {
        reason: reason.into(),
    }
}

/// Creates a corrupt marker error
pub fn marker_corrupt(path: impl Into<String>, reason: impl Into<String>) -> RniError {
    RniError::MarkerCorrupt {
        path: path.into(),
        reason: reason.into(),
    }
}

/// Creates an unrecognized environment error
pub fn unrecognized(path: impl Into<String>) -> RniError {
    RniError::EnvironmentUnrecognized { path: path.into() }
}

/// Creates a confirmation required error
pub fn confirmation_required(path: impl Into<String>) -> RniError {
    RniError::ConfirmationRequired { path: path.into() }
}
