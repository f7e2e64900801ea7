#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Thor's turns against the game referee.

mod config;
mod protocol;
mod session;

use std::io;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use config::Cli;

/// Entry point for the Thor arena command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let settings = Cli::parse().settings()?;
    tracing::debug!(?settings, "configuration resolved");

    let turns = session::run(io::stdin().lock(), io::stdout().lock(), settings)?;
    tracing::info!(turns, "game over");
    Ok(())
}
