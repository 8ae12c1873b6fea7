use clap::Parser;

/// Arguments for the clean command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Remove the environment after confirming:\n    rnictl clean\n\n\
                  Remove without confirmation:\n    rnictl clean -y")]
pub struct CleanArgs {
    /// Skip confirmation prompt
    #[arg(long, short = 'y')]
    pub yes: bool,
}
