//! Start command implementation

use crate::cli::StartArgs;
use crate::commands::helpers::{self, Context};
use crate::error::Result;
use crate::launch::{Interrupts, LaunchConfig, Launcher, SessionOutcome};

/// Run start command
///
/// Returns the exit code for rnictl: the server's own code, or 0 when the
/// operator stopped it.
pub fn run(ctx: &Context, args: StartArgs) -> Result<i32> {
    let project = helpers::open_project(ctx)?;

    let mut config = LaunchConfig::from_project(&project);
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(entry) = args.entry {
        config.entry = project.resolve(&entry);
    }
    if let Some(address) = args.address {
        config.address = Some(address);
    }

    let entry = config.entry.display().to_string();
    let port = config.port;
    let mut launcher = Launcher::prepare(&project.environment_root(), config)?;

    // Handlers go in before the spawn so an early Ctrl-C still stops the server
    let interrupts = Interrupts::register()?;

    let mut reporter = ctx.reporter();
    reporter.step(&format!("Starting {entry} on port {port}"));
    reporter.note(&format!(
        "Local URL: http://localhost:{port}  (Ctrl-C to stop)"
    ));

    let outcome = launcher.run(&interrupts)?;

    match outcome {
        SessionOutcome::Interrupted(_) => reporter.success("Server stopped"),
        SessionOutcome::Exited(_) if outcome.exit_code() != 0 => {
            reporter.warn(&format!("Server exited with code {}", outcome.exit_code()));
        }
        SessionOutcome::Exited(_) => {}
    }
    Ok(outcome.exit_code())
}
