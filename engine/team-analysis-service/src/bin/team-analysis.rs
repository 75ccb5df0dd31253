//! # Team Analysis Binary
//!
//! Command-line entry point for post-auction team analysis.

use anyhow::{Context, Result};
use clap::Parser;
use team_analysis_service::cli::{Cli, CliHandler};
use team_analysis_service::{load_config, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // DATABASE_URL may come from a local .env file
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    logging::initialize_logging(&config.logging)?;

    let handler = CliHandler::new(config, cli.json);
    handler.handle_command(cli.command).await?;

    Ok(())
}
