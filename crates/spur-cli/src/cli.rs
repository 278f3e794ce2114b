//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Spur - Turn expenses into reward coins
#[derive(Parser)]
#[command(name = "spur")]
#[command(about = "Reward scoring engine for budget gamification", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Model artifact path (JSON)
    ///
    /// Falls back to SPUR_MODEL_PATH, then the platform data directory
    /// (~/.local/share/spur/model/reward_model.json). Without an
    /// artifact, scoring uses the deterministic fallback rules.
    #[arg(long, global = true)]
    pub model: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the scoring API server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "5000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Allowed CORS origin (repeat for multiple)
        #[arg(long = "cors-origin")]
        cors_origins: Vec<String>,
    },

    /// Score a single expense event and print the result as JSON
    Score {
        /// Transaction amount
        #[arg(short, long)]
        amount: f64,

        /// Spending category (e.g. food, entertainment)
        #[arg(short, long)]
        category: String,

        /// ISO-8601 timestamp (defaults to now)
        #[arg(short, long)]
        timestamp: Option<String>,

        /// Spending velocity relative to the user's norm
        #[arg(long, default_value = "1.0")]
        velocity: f64,

        /// Category frequency in [0, 1]
        #[arg(long, default_value = "0.5")]
        frequency: f64,

        /// Cumulative category spend relative to budget
        #[arg(long = "budget-ratio", default_value = "0.5")]
        budget_ratio: f64,
    },

    /// Score every event in a CSV file, one JSON result per line
    Batch {
        /// CSV file with columns: amount, category, timestamp
        /// (optionally spending_velocity, category_frequency, budget_ratio)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// List the known category vocabulary
    Categories,

    /// Show model artifact status
    Model,
}
