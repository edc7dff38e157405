//! Multitoe console game.
//!
//! Plays a session on stdin/stdout. Logs go to stderr, filtered by
//! `RUST_LOG` (default `warn`).

use std::io;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use multitoe::config::{DEFAULT_LOG_FILTER, LOG_FILTER_ENV};
use multitoe::console::Console;

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Multitoe v{}", env!("CARGO_PKG_VERSION"));

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock());

    let session = console.run().context("Session ended unexpectedly")?;
    info!(games_played = session.games_played(), "Goodbye");

    Ok(())
}
