//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI
//! arguments. The actual command implementations are in the `commands`
//! module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Outlay - Turn receipt photos into categorized expenses
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Receipt expense manager with AI extraction", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "outlay.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Disable authentication (for local development only)
        ///
        /// WARNING: Do not use this flag when exposing the server to a network.
        /// By default, the server requires a Bearer API key (OUTLAY_API_KEYS).
        #[arg(long)]
        no_auth: bool,

        /// Directory containing static files to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// Process a receipt image without the server (one-shot pipeline)
    Process {
        /// Receipt image file
        #[arg(short, long)]
        file: PathBuf,

        /// Display name for the receipt (defaults to the file name)
        #[arg(short, long)]
        name: Option<String>,
    },

    /// List persisted expenses
    Expenses {
        /// Maximum number of rows
        #[arg(short, long, default_value = "20")]
        limit: i64,

        /// Filter by category (travel, food, office, fuel, miscellaneous)
        #[arg(short, long)]
        category: Option<String>,

        /// Show per-category totals instead of individual expenses
        #[arg(long)]
        summary: bool,
    },

    /// AI backend utilities
    Ai {
        #[command(subcommand)]
        action: AiAction,
    },
}

#[derive(Subcommand)]
pub enum AiAction {
    /// Test the AI backend connection (and optionally a live extraction)
    Test {
        /// Receipt image to run through extraction
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}
