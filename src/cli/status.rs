use clap::Parser;

/// Arguments for the status command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Show status:\n    rnictl status\n\n\
                  Machine-readable status:\n    rnictl status --json")]
pub struct StatusArgs {
    /// Print status as JSON
    #[arg(long)]
    pub json: bool,
}
