//! Launch errors

use super::RniError;

/// Creates a launch failed error
pub fn failed(command: impl Into<String>, reason: impl Into<String>) -> RniError {
    RniError::LaunchFailed {
        command: command.into(),
        reason: reason.into(),
    }
}

/// Creates a port in use error
pub fn port_in_use(port: u16, address: impl Into<String>) -> RniError {
    RniError::PortInUse {
        port,
        address: address.into(),
    }
}

/// Creates an entry file not found error
pub fn entry_not_found(path: impl Into<String>) -> RniError {
    RniError::EntryFileNotFound { path: path.into() }
}
