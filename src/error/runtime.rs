//! Runtime detection errors

use super::RniError;

/// Creates a runtime missing error
pub fn missing(runtime: impl Into<String>, reason: impl Into<String>) -> RniError {
    RniError::PrerequisiteMissing {
        runtime: runtime.into(),
        reason: reason.into(),
    }
}
