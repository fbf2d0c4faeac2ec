//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for fx-ingest using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// fx-ingest - Bank of Canada FX observations to PostgreSQL
#[derive(Parser, Debug)]
#[command(name = "fx-ingest")]
#[command(version, about, long_about = None)]
#[command(author = "fx-ingest Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "fx-ingest.toml", env = "FX_INGEST_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "FX_INGEST_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load new observations into the raw table
    Ingest(commands::ingest::IngestArgs),

    /// Show the stored watermark per series
    Status(commands::status::StatusArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),
}
