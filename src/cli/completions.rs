use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    rnictl completions --shell bash > ~/.bash_completion.d/rnictl\n\n\
                  Generate zsh completions:\n    rnictl completions --shell zsh > ~/.zfunc/_rnictl\n\n\
                  Generate fish completions:\n    rnictl completions --shell fish > ~/.config/fish/completions/rnictl.fish\n\n\
                  Generate PowerShell completions:\n    rnictl completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, value_enum, ignore_case = true)]
    pub shell: Shell,
}
