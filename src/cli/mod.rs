//! CLI definitions using clap derive API
//!
//! One submodule per command's argument types:
//! - install: Install command arguments
//! - start: Start command arguments
//! - status: Status command arguments
//! - clean: Clean command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

pub mod clean;
pub mod completions;
pub mod install;
pub mod start;
pub mod status;

pub use clean::CleanArgs;
pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use start::StartArgs;
pub use status::StatusArgs;

/// rnictl - provision and launch the RNI measurement database app
///
/// Creates an isolated Python environment, installs the app's dependencies
/// and runs the Streamlit server on a fixed port.
#[derive(Parser, Debug)]
#[command(
    name = "rnictl",
    author,
    version,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Provision and launch the RNI measurement database app",
    long_about = "rnictl verifies that Python 3 is available, creates an isolated virtual \
                  environment, installs the dependencies from requirements.txt and runs the \
                  Streamlit app on a fixed port. Re-running install is always safe.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  rnictl install                 \x1b[90m# Create venv and install requirements.txt\x1b[0m\n   \
                  rnictl start                   \x1b[90m# Run the app on port 8501\x1b[0m\n   \
                  rnictl start --port 8600       \x1b[90m# Run on another port\x1b[0m\n   \
                  rnictl status                  \x1b[90m# Show what is provisioned\x1b[0m\n   \
                  rnictl clean --yes             \x1b[90m# Remove the environment\x1b[0m\n\n\
                  "
)]
pub struct Cli {
    /// Project directory holding the app and requirements.txt (defaults to current directory)
    #[arg(long, short = 'p', global = true, env = "RNICTL_PROJECT")]
    pub project: Option<PathBuf>,

    /// Configuration file (defaults to <project>/rnictl.yaml)
    #[arg(long, global = true, env = "RNICTL_CONFIG")]
    pub config: Option<PathBuf>,

    /// More diagnostic output (-v info, -vv debug, -vvv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress output
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create the environment and install dependencies
    Install(InstallArgs),

    /// Launch the app in the provisioned environment
    Start(StartArgs),

    /// Show runtime, environment and port status
    Status(StatusArgs),

    /// Remove the environment
    Clean(CleanArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}
