//! Diagnostic logging setup
//!
//! Logs go to stderr through `tracing-subscriber`. `RNICTL_LOG` takes any
//! `EnvFilter` directive and wins over the `-v` count.

use tracing_subscriber::{EnvFilter, prelude::*};

/// Environment variable overriding the log filter
pub const LOG_ENV: &str = "RNICTL_LOG";

/// Filter directive for a `-v` count
pub fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "rnictl=error";
    }
    match verbosity {
        0 => "rnictl=warn",
        1 => "rnictl=info",
        2 => "rnictl=debug",
        _ => "rnictl=trace",
    }
}

/// Initialize tracing. Call once at process startup.
pub fn init_tracing(verbosity: u8, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity, quiet)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbosity >= 2)
                .without_time(),
        )
        .try_init();
}
