//! Shell completions command

use clap::CommandFactory;

use crate::cli::CompletionsArgs;
use crate::error::Result;

/// Generate shell completions for `args.shell` into `out`
pub fn generate(args: &CompletionsArgs, out: &mut dyn std::io::Write) {
    let mut cmd = <crate::cli::Cli as CommandFactory>::command();
    clap_complete::generate(args.shell, &mut cmd, "rnictl", out);
}

/// Generate shell completions on stdout
pub fn run(args: CompletionsArgs) -> Result<()> {
    generate(&args, &mut std::io::stdout().lock());
    Ok(())
}
