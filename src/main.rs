//! HUSH Backend
//!
#![doc = "Main entry point for the HUSH backend server and its maintenance commands."]

use anyhow::Result;

use hush::cli::{Cli, Commands};
use hush::commands;
use hush::config::Config;
use hush::logging::init_tracing;
use hush::server::run_server;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse_args();

    // Load configuration; logging format depends on it
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path, &cli)?;

    init_tracing(cli.verbose, config.logging.json)?;
    tracing::debug!("Loaded configuration from {}: {:?}", config_path, config);

    // Validate configuration
    config.validate()?;

    match cli.command.unwrap_or(Commands::Serve { bind: None }) {
        Commands::Serve { .. } => {
            tracing::info!("Starting HTTP server");
            run_server(&config).await?;
        }
        Commands::Seed => {
            tracing::info!("Bootstrapping snapshot store");
            commands::run_seed(&config)?;
        }
        Commands::Dashboard { json } => {
            commands::dashboard::show_dashboard(&config, json)?;
        }
    }

    Ok(())
}
