//! Advisory locking of an environment
//!
//! Two installs against the same environment would race on its contents, so
//! provisioning holds an exclusive lock for its whole run. A second run fails
//! fast instead of waiting.

use std::fs;
use std::path::PathBuf;

use fslock::LockFile;

use super::EnvironmentLayout;
use crate::error::{self, Result};

/// RAII guard for environment locking
///
/// Released on drop. The lock file itself is left in place: removing it while
/// another process has it open would let a third process lock a fresh inode.
#[derive(Debug)]
pub struct EnvironmentGuard {
    lock: LockFile,
    lock_path: PathBuf,
}

impl EnvironmentGuard {
    /// Try to take the lock of `layout` without blocking
    pub fn try_acquire(layout: &EnvironmentLayout) -> Result<Self> {
        let lock_path = layout.lock_path();
        if let Some(parent) = lock_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                error::environment::lock_failed(format!(
                    "Failed to create {}: {e}",
                    parent.display()
                ))
            })?;
        }

        let mut lock = LockFile::open(&lock_path).map_err(|e| {
            error::environment::lock_failed(format!(
                "Failed to open lock file {}: {e}",
                lock_path.display()
            ))
        })?;

        let acquired = lock.try_lock().map_err(|e| {
            error::environment::lock_failed(format!("Failed to acquire lock: {e}"))
        })?;
        if !acquired {
            return Err(error::environment::locked(layout.root().display().to_string()));
        }

        tracing::debug!(path = %lock_path.display(), "environment lock acquired");
        Ok(Self { lock, lock_path })
    }
}

impl Drop for EnvironmentGuard {
    fn drop(&mut self) {
        let _ = self.lock.unlock();
        tracing::debug!(path = %self.lock_path.display(), "environment lock released");
    }
}
