use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Provision the project in the current directory:\n    rnictl install\n\n\
                  Rebuild a broken or outdated environment:\n    rnictl install --recreate\n\n\
                  Reinstall dependencies even if requirements.txt is unchanged:\n    rnictl install --reinstall\n\n\
                  Skip the pip self-upgrade (offline mirrors):\n    rnictl install --no-upgrade")]
pub struct InstallArgs {
    /// Remove the existing environment and create it from scratch
    #[arg(long)]
    pub recreate: bool,

    /// Install dependencies even when requirements.txt has not changed
    #[arg(long)]
    pub reinstall: bool,

    /// Do not upgrade pip before installing
    #[arg(long)]
    pub no_upgrade: bool,
}
