//! Clean command implementation

use std::io::IsTerminal;

use inquire::Confirm;

use crate::cli::CleanArgs;
use crate::commands::helpers::{self, Context};
use crate::environment::{self, EnvironmentGuard, EnvironmentLayout};
use crate::error::{self, Result};

/// Run clean command
pub fn run(ctx: &Context, args: CleanArgs) -> Result<()> {
    let project = helpers::open_project(ctx)?;
    let layout = EnvironmentLayout::for_root(project.environment_root());
    let root = layout.root();
    let mut reporter = ctx.reporter();

    if !root.exists() {
        reporter.success(&format!("No environment at {}", root.display()));
        return Ok(());
    }

    let _guard = EnvironmentGuard::try_acquire(&layout)?;
    environment::ensure_removable(root)?;

    if !args.yes {
        if !std::io::stdin().is_terminal() {
            return Err(error::environment::confirmation_required(
                root.display().to_string(),
            ));
        }
        let state = environment::inspect(root);
        let confirmed = Confirm::new(&format!(
            "Remove environment {} ({state})?",
            root.display()
        ))
        .with_default(false)
        .with_help_message("The next 'rnictl install' recreates it")
        .prompt()?;
        if !confirmed {
            reporter.note("Nothing removed");
            return Ok(());
        }
    }

    environment::remove(root)?;
    reporter.success(&format!("Removed environment {}", root.display()));
    Ok(())
}
