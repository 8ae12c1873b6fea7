//! Completion marker (`.rnictl-complete.json`)
//!
//! The marker records how far provisioning got. It is the only evidence the
//! launcher trusts: a directory without one is never treated as complete.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{self, Result};

/// Marker filename inside the environment root
pub const MARKER_FILE: &str = ".rnictl-complete.json";

/// Current marker format version
const MARKER_VERSION: u32 = 1;

/// Provisioning stage recorded by the marker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Environment created, dependencies not (fully) installed
    Created,
    /// Dependencies installed from the fingerprinted manifest
    Ready,
}

/// Contents of the completion marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMarker {
    /// Marker format version
    pub version: u32,

    /// Provisioning stage reached
    pub stage: Stage,

    /// Interpreter version the environment was created with
    pub runtime_version: String,

    /// Fingerprint of the manifest installed at `Ready`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manifest_fingerprint: Option<String>,
}

impl CompletionMarker {
    /// Marker for a freshly created environment
    pub fn created(runtime_version: impl Into<String>) -> Self {
        Self {
            version: MARKER_VERSION,
            stage: Stage::Created,
            runtime_version: runtime_version.into(),
            manifest_fingerprint: None,
        }
    }

    /// Promote to `Ready` for the given manifest fingerprint
    #[must_use]
    pub fn ready(mut self, fingerprint: impl Into<String>) -> Self {
        self.stage = Stage::Ready;
        self.manifest_fingerprint = Some(fingerprint.into());
        self
    }

    /// Demote to `Created`, keeping the runtime version
    #[must_use]
    pub fn pending(mut self) -> Self {
        self.stage = Stage::Created;
        self.manifest_fingerprint = None;
        self
    }

    /// Path of the marker inside `root`
    pub fn path(root: &Path) -> PathBuf {
        root.join(MARKER_FILE)
    }

    /// Read the marker from `root`; `None` when there is none
    pub fn read(root: &Path) -> Result<Option<Self>> {
        let path = Self::path(root);
        if !path.is_file() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| error::fs::read_failed(path.display().to_string(), e.to_string()))?;
        let marker: Self = serde_json::from_str(&content).map_err(|e| {
            error::environment::marker_corrupt(path.display().to_string(), e.to_string())
        })?;

        if marker.version != MARKER_VERSION {
            return Err(error::environment::marker_corrupt(
                path.display().to_string(),
                format!("unsupported marker version {}", marker.version),
            ));
        }
        Ok(Some(marker))
    }

    /// Write the marker into `root` atomically
    ///
    /// The content goes to a temp file in the same directory which is then
    /// renamed over the marker, so readers see the old or the new marker and
    /// never a torn write.
    pub fn write(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        let write_err = |e: &dyn std::fmt::Display| {
            error::fs::write_failed(path.display().to_string(), e.to_string())
        };

        let content = serde_json::to_string_pretty(self)?;
        let mut tmp = NamedTempFile::new_in(root).map_err(|e| write_err(&e))?;
        tmp.write_all(content.as_bytes()).map_err(|e| write_err(&e))?;
        tmp.as_file().sync_all().map_err(|e| write_err(&e))?;
        tmp.persist(&path).map_err(|e| write_err(&e.error))?;

        tracing::debug!(path = %path.display(), stage = ?self.stage, "marker written");
        Ok(())
    }
}
