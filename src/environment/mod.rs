//! Isolated Python environments
//!
//! An environment is a directory created by `python -m venv` plus the
//! completion marker rnictl writes into it:
//!
//! ```text
//! <project>/
//! ├── .venv.lock               # Advisory lock (sibling of the root)
//! └── venv/
//!     ├── .rnictl-complete.json  # Completion marker
//!     ├── pyvenv.cfg
//!     └── bin/                   # Scripts\ on Windows
//!         ├── activate
//!         └── python
//! ```
//!
//! Existence of the directory proves nothing. Only the marker moves an
//! environment past `Incomplete`, and only a `ready` marker lets the launcher
//! use it.

pub mod layout;
pub mod lock;
pub mod marker;

use std::fmt;
use std::fs;
use std::path::Path;

pub use layout::EnvironmentLayout;
pub use lock::EnvironmentGuard;
pub use marker::{CompletionMarker, MARKER_FILE, Stage};

use crate::error::{self, Result};
use crate::hash;

/// Observed state of an environment root
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnvironmentState {
    /// The root does not exist
    Absent,
    /// The root exists but holds no usable marker or interpreter
    Incomplete,
    /// Created; dependencies not installed yet
    Created(CompletionMarker),
    /// Dependencies installed from the fingerprinted manifest
    Ready(CompletionMarker),
}

impl EnvironmentState {
    /// Short lowercase name used in messages and `status --json`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Absent => "absent",
            Self::Incomplete => "incomplete",
            Self::Created(_) => "created",
            Self::Ready(_) => "ready",
        }
    }

    pub fn marker(&self) -> Option<&CompletionMarker> {
        match self {
            Self::Created(marker) | Self::Ready(marker) => Some(marker),
            Self::Absent | Self::Incomplete => None,
        }
    }
}

impl fmt::Display for EnvironmentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Inspect the environment at `root` without changing anything
pub fn inspect(root: &Path) -> EnvironmentState {
    if !root.exists() {
        return EnvironmentState::Absent;
    }

    let marker = match CompletionMarker::read(root) {
        Ok(Some(marker)) => marker,
        Ok(None) => return EnvironmentState::Incomplete,
        Err(e) => {
            tracing::warn!(root = %root.display(), error = %e, "ignoring unreadable marker");
            return EnvironmentState::Incomplete;
        }
    };

    // A marker over a missing interpreter is a damaged environment
    if !EnvironmentLayout::for_root(root).has_interpreter() {
        tracing::warn!(root = %root.display(), "marker present but interpreter missing");
        return EnvironmentState::Incomplete;
    }

    match marker.stage {
        Stage::Created => EnvironmentState::Created(marker),
        Stage::Ready => EnvironmentState::Ready(marker),
    }
}

/// Whether `root` is safe to delete as an environment
///
/// True for an empty directory or one holding `pyvenv.cfg` or a completion
/// marker (readable or not). A misconfigured `environment.path` pointing at
/// the project or a data directory fails this check.
pub fn is_recognized(root: &Path) -> bool {
    let layout = EnvironmentLayout::for_root(root);
    if layout.config_file().is_file() || CompletionMarker::path(root).is_file() {
        return true;
    }
    fs::read_dir(root).is_ok_and(|mut entries| entries.next().is_none())
}

/// Fail with `EnvironmentUnrecognized` unless `root` is absent or recognized
pub fn ensure_removable(root: &Path) -> Result<()> {
    if root.exists() && !is_recognized(root) {
        return Err(error::environment::unrecognized(root.display().to_string()));
    }
    Ok(())
}

/// Remove the environment root and everything in it
///
/// Removing an absent root is not an error. A directory that does not look
/// like an environment is refused.
pub fn remove(root: &Path) -> Result<()> {
    if !root.exists() {
        return Ok(());
    }
    ensure_removable(root)?;
    fs::remove_dir_all(root)
        .map_err(|e| error::fs::write_failed(root.display().to_string(), e.to_string()))?;
    tracing::debug!(root = %root.display(), "environment removed");
    Ok(())
}

/// An environment that has at least been created
#[derive(Debug, Clone)]
pub struct Environment {
    layout: EnvironmentLayout,
    marker: CompletionMarker,
}

impl Environment {
    pub(crate) fn new(layout: EnvironmentLayout, marker: CompletionMarker) -> Self {
        Self { layout, marker }
    }

    /// Open the environment at `root` if it is `Created` or `Ready`
    #[cfg(test)]
    pub fn open(root: &Path) -> Option<Self> {
        match inspect(root) {
            EnvironmentState::Created(marker) | EnvironmentState::Ready(marker) => Some(Self {
                layout: EnvironmentLayout::for_root(root),
                marker,
            }),
            EnvironmentState::Absent | EnvironmentState::Incomplete => None,
        }
    }

    pub fn root(&self) -> &Path {
        self.layout.root()
    }

    pub fn layout(&self) -> &EnvironmentLayout {
        &self.layout
    }

    pub fn marker(&self) -> &CompletionMarker {
        &self.marker
    }

    /// Whether dependencies were installed from a manifest with `fingerprint`
    pub fn is_ready_for(&self, fingerprint: &str) -> bool {
        self.marker.stage == Stage::Ready
            && self
                .marker
                .manifest_fingerprint
                .as_deref()
                .is_some_and(|recorded| hash::verify_hash(recorded, fingerprint))
    }

    /// Record a new marker, written before it is kept
    pub fn set_marker(&mut self, marker: CompletionMarker) -> Result<()> {
        marker.write(self.root())?;
        self.marker = marker;
        Ok(())
    }
}

/// An environment whose dependencies are installed
///
/// The only way to obtain one is [`ProvisionedEnvironment::verify`], so
/// anything holding it may start the application.
#[derive(Debug, Clone)]
pub struct ProvisionedEnvironment {
    inner: Environment,
}

impl ProvisionedEnvironment {
    /// Verify `root` is `Ready`
    pub fn verify(root: &Path) -> Result<Self> {
        match inspect(root) {
            EnvironmentState::Ready(marker) => Ok(Self {
                inner: Environment {
                    layout: EnvironmentLayout::for_root(root),
                    marker,
                },
            }),
            state => Err(error::environment::not_provisioned(
                root.display().to_string(),
                state.name(),
            )),
        }
    }

    pub fn root(&self) -> &Path {
        self.inner.root()
    }

    pub fn layout(&self) -> &EnvironmentLayout {
        self.inner.layout()
    }

    pub fn marker(&self) -> &CompletionMarker {
        self.inner.marker()
    }
}
