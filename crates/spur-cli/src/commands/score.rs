//! Single-event scoring command

use std::path::Path;

use anyhow::{Context, Result};

use spur_core::{ExpenseEvent, RewardEngine};

pub fn cmd_score(
    model_path: Option<&Path>,
    amount: f64,
    category: &str,
    timestamp: Option<&str>,
    velocity: f64,
    frequency: f64,
    budget_ratio: f64,
) -> Result<()> {
    let engine = RewardEngine::bootstrap(model_path)?;

    let event = ExpenseEvent {
        amount,
        category: category.to_string(),
        timestamp: timestamp
            .map(str::to_string)
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339()),
        spending_velocity: velocity,
        category_frequency: frequency,
        budget_ratio,
    };

    let result = engine
        .score(&event)
        .context("Failed to score expense event")?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}
