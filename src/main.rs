//! Entry point for acu, a terminal prompt optimizer.
//!
//! Rewrites a rough prompt for a target LLM family using whichever provider
//! key is available, falling back across OpenRouter's free models when the
//! free tier is in use.

mod cli;
mod config;
mod constants;
mod error;
mod format;
mod history;
mod models;
mod optimize;
mod prompts;
mod provider;
mod tokens;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

/// Runs the acu CLI.
///
/// Loads `.env` files (silently ignored if absent), sets up logging to
/// stderr, parses command-line arguments, and dispatches the chosen
/// subcommand via [`cli::run`].
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    cli::run(cli).await
}
