//! Command helper utilities

use std::path::PathBuf;

use crate::config::Project;
use crate::error::{self, Result};
use crate::ui::{self, Reporter};

/// Global options shared by every command
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub project: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub quiet: bool,
}

impl Context {
    /// Reporter honouring `--quiet`
    pub fn reporter(&self) -> Box<dyn Reporter> {
        ui::reporter(self.quiet)
    }
}

/// Resolve project path from optional argument
///
/// If a project path is provided, use it. Otherwise,
/// resolve to the current directory.
pub fn resolve_project_path(project: Option<PathBuf>) -> Result<PathBuf> {
    match project {
        Some(path) => Ok(path),
        None => std::env::current_dir().map_err(|e| {
            error::fs::io_error(format!("Failed to get current directory: {e}"))
        }),
    }
}

/// Open the project selected by `--project` and `--config`
pub fn open_project(ctx: &Context) -> Result<Project> {
    let root = resolve_project_path(ctx.project.clone())?;
    if !root.is_dir() {
        return Err(error::fs::io_error(format!(
            "Project directory {} does not exist",
            root.display()
        )));
    }
    let project = Project::open(&root, ctx.config.as_deref())?;
    tracing::debug!(root = %project.root.display(), "project opened");
    Ok(project)
}
