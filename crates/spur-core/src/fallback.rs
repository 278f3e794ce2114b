//! Deterministic rule-based scoring path
//!
//! Used whenever the predictor port is unavailable or fails. Fully
//! self-contained: base coins by category, a tagged budget-ratio
//! multiplier, an amount-magnitude modifier, and an extra luxury
//! penalty for discretionary overspending, combined multiplicatively
//! and clamped like the model path.

use crate::adjust::clamp_coins;
use crate::error::{Error, Result};
use crate::models::ExpenseEvent;
use crate::policy::PolicyTables;

/// Full trace of one fallback evaluation.
#[derive(Debug, Clone)]
pub struct FallbackScore {
    pub coins: u32,
    pub base_coins: u32,
    pub budget_multiplier: f64,
    /// Human-readable budget tier tag, surfaced in the breakdown
    pub spending_tag: String,
    pub amount_modifier: f64,
    pub luxury_penalty: f64,
}

/// Score one event from the rule tables alone.
///
/// Deterministic and side-effect-free: identical input always yields an
/// identical score. The only failure mode is a non-finite numeric field,
/// which the facade degrades to the minimal safe result.
pub fn score(tables: &PolicyTables, event: &ExpenseEvent) -> Result<FallbackScore> {
    if !event.amount.is_finite() || event.amount < 0.0 {
        return Err(Error::MalformedEvent(format!(
            "amount {} is not a non-negative number",
            event.amount
        )));
    }
    if !event.budget_ratio.is_finite() || event.budget_ratio < 0.0 {
        return Err(Error::MalformedEvent(format!(
            "budget_ratio {} is not a non-negative number",
            event.budget_ratio
        )));
    }

    let category = tables.category(&event.category);
    let budget = tables.fallback.budget.select(event.budget_ratio);
    let amount = tables.fallback.amount.select(event.amount);

    let luxury_penalty = if event.budget_ratio > tables.luxury.trigger_ratio {
        tables.luxury.factor(category.luxury)
    } else {
        1.0
    };

    let raw =
        category.base_coins as f64 * budget.factor * amount.factor * luxury_penalty;

    Ok(FallbackScore {
        coins: clamp_coins(raw),
        base_coins: category.base_coins,
        budget_multiplier: budget.factor,
        spending_tag: budget.tag.clone().unwrap_or_default(),
        amount_modifier: amount.factor,
        luxury_penalty,
    })
}
