//! Outlay CLI - Receipt expense manager
//!
//! Usage:
//!   outlay init                    Initialize database
//!   outlay serve --port 8080       Start web server
//!   outlay process --file IMG      Run the pipeline on one receipt
//!   outlay expenses                List persisted expenses

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            no_auth,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, no_auth, static_dir.as_deref()).await,
        Commands::Process { file, name } => {
            commands::cmd_process(&cli.db, &file, name.as_deref()).await
        }
        Commands::Expenses {
            limit,
            category,
            summary,
        } => commands::cmd_expenses(&cli.db, limit, category.as_deref(), summary),
        Commands::Ai { action } => match action {
            AiAction::Test { file } => commands::cmd_ai_test(file.as_deref()).await,
        },
    }
}
