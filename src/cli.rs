//! Command-line interface definition for HUSH
//!
//! This module defines the CLI structure using clap's derive API. Running
//! the binary without a subcommand starts the HTTP server.

use clap::{Parser, Subcommand};

/// HUSH Backend - simulated FL/DP aggregation service
#[derive(Parser, Debug, Clone)]
#[command(name = "hush")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the snapshot database path
    #[arg(long)]
    pub db_path: Option<String>,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,

    /// Command to execute (defaults to `serve`)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for HUSH
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind, overriding the config file
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Create the snapshot table and seed it if empty, then exit
    Seed,

    /// Print the stored snapshot history
    Dashboard {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
