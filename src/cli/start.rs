use clap::Parser;
use std::path::PathBuf;

/// Arguments for the start command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Run the app on the configured port (8501 by default):\n    rnictl start\n\n\
                  Run on another port:\n    rnictl start --port 8600\n\n\
                  Listen on localhost only:\n    rnictl start --address 127.0.0.1\n\n\
                  Run a different script:\n    rnictl start --entry pages/admin.py\n\n\
                  Stop the app with Ctrl-C; rnictl exits 0 once the server is down.")]
pub struct StartArgs {
    /// Port to serve on (overrides launch.port)
    #[arg(long, env = "RNICTL_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// App script, relative to the project directory (overrides launch.entry)
    #[arg(long)]
    pub entry: Option<PathBuf>,

    /// Address to bind (overrides launch.address)
    #[arg(long)]
    pub address: Option<String>,
}
