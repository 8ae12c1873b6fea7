//! Configuration file handling for rnictl
//!
//! This module contains data structures for:
//! - `rnictl.yaml` - Project configuration
//! - `requirements.txt` - Dependency manifest
//!
//! [`Project`] ties both to a project directory and resolves the relative
//! paths they contain.

pub mod manifest;
pub mod project;

use std::path::{Path, PathBuf};

// Re-export commonly used types
pub use manifest::Manifest;
pub use project::ProjectConfig;

use crate::error::Result;

/// Configuration filename looked up in the project directory
pub const CONFIG_FILE: &str = "rnictl.yaml";

/// A project directory together with its configuration
#[derive(Debug, Clone)]
pub struct Project {
    /// Project directory (holds the entry file and the manifest)
    pub root: PathBuf,

    /// Loaded configuration
    pub config: ProjectConfig,
}

impl Project {
    /// Open the project at `root`, reading `config_path` or `<root>/rnictl.yaml`
    pub fn open(root: &Path, config_path: Option<&Path>) -> Result<Self> {
        let root = dunce::canonicalize(root).unwrap_or_else(|_| root.to_path_buf());
        let config = match config_path {
            Some(path) => ProjectConfig::load(path, true)?,
            None => ProjectConfig::load(&root.join(CONFIG_FILE), false)?,
        };
        Ok(Self { root, config })
    }

    /// Build a project from an in-memory configuration
    #[cfg(test)]
    pub fn with_config(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Absolute environment root
    pub fn environment_root(&self) -> PathBuf {
        self.resolve(&self.config.environment.path)
    }

    /// Absolute manifest path
    pub fn manifest_path(&self) -> PathBuf {
        self.resolve(&self.config.manifest)
    }

    /// Absolute entry file path
    pub fn entry_path(&self) -> PathBuf {
        self.resolve(&self.config.launch.entry)
    }

    /// Resolve `path` against the project directory unless it is absolute
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}
