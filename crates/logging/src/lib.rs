//! Logging initialization for the rsidx CLI.
//!
//! Logs go to STDERR so STDOUT stays clean for machine-readable command
//! output (JSON dumps, key listings). `RUST_LOG` selects the level;
//! `--verbose` forces debug.

use tracing_subscriber::EnvFilter;

pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
