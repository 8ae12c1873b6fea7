//! rnictl - provision and launch the RNI measurement database app
//!
//! A command line tool that checks for a Python 3 runtime, creates an isolated
//! virtual environment, installs the app's declared dependencies and runs the
//! Streamlit server on a fixed port under foreground supervision.

use clap::Parser;

mod cli;
mod commands;
mod config;
mod environment;
mod error;
mod hash;
mod launch;
mod observability;
mod process;
mod provision;
mod runtime;
mod ui;

#[cfg(test)]
mod test_fixtures;

use cli::{Cli, Commands};
use commands::helpers::Context;
use error::Result;

fn dispatch(cli: Cli) -> Result<i32> {
    let ctx = Context {
        project: cli.project,
        config: cli.config,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Install(args) => commands::install::run(&ctx, args).map(|()| 0),
        Commands::Start(args) => commands::start::run(&ctx, args),
        Commands::Status(args) => commands::status::run(&ctx, args).map(|()| 0),
        Commands::Clean(args) => commands::clean::run(&ctx, args).map(|()| 0),
        Commands::Version => commands::version::run().map(|()| 0),
        Commands::Completions(args) => commands::completions::run(args).map(|()| 0),
    }
}

fn main() {
    let cli = Cli::parse();
    observability::init_tracing(cli.verbose, cli.quiet);
    // Long environment paths wrap badly at the default 80 columns
    let _ = miette::set_hook(Box::new(|_| {
        Box::new(miette::MietteHandlerOpts::new().width(160).build())
    }));

    let code = match dispatch(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{:?}", miette::Report::new(e));
            1
        }
    };
    std::process::exit(code);
}
