//! Spur CLI - Reward scoring for budget gamification
//!
//! Usage:
//!   spur serve --port 5000      Start the scoring API server
//!   spur score --amount 25.50 --category food
//!   spur batch --file events.csv
//!   spur categories             List the known category vocabulary
//!   spur model                  Show model artifact status

mod cli;
mod commands;

#[cfg(test)]
mod tests;

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
        Commands::Serve {
            port,
            host,
            cors_origins,
        } => commands::cmd_serve(cli.model.as_deref(), &host, port, cors_origins).await,
        Commands::Score {
            amount,
            category,
            timestamp,
            velocity,
            frequency,
            budget_ratio,
        } => commands::cmd_score(
            cli.model.as_deref(),
            amount,
            &category,
            timestamp.as_deref(),
            velocity,
            frequency,
            budget_ratio,
        ),
        Commands::Batch { file } => commands::cmd_batch(cli.model.as_deref(), &file),
        Commands::Categories => commands::cmd_categories(),
        Commands::Model => commands::cmd_model(cli.model.as_deref()),
    }
}
