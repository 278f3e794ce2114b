//! Model-path reward adjustments
//!
//! Post-processes the clamped model estimate through the shared
//! multiplicative policy: category priority, budget-ratio overspend
//! penalty, amount-magnitude penalty. Multiplicative composition keeps
//! each dimension independently tunable and the output monotone in each
//! input when the others are fixed.

use crate::models::{ExpenseEvent, MAX_COINS, MIN_COINS};
use crate::policy::PolicyTables;

/// Trace of one adjustment pass, feeding the result breakdown.
#[derive(Debug, Clone)]
pub struct Adjustment {
    pub category_priority: f64,
    pub overspend_penalty: f64,
    pub amount_penalty: f64,
    pub final_coins: u32,
}

/// Floor a raw value and clamp it into the coin range. Total: NaN maps
/// to the floor of the range.
pub fn clamp_coins(value: f64) -> u32 {
    let floored = value.floor();
    if !(floored >= MIN_COINS as f64) {
        MIN_COINS
    } else if floored > MAX_COINS as f64 {
        MAX_COINS
    } else {
        floored as u32
    }
}

/// Apply the model-path adjustment policy to a clamped base estimate.
pub fn apply(tables: &PolicyTables, event: &ExpenseEvent, base_coins: u32) -> Adjustment {
    let category_priority = tables.category(&event.category).priority;
    let overspend_penalty = tables.model.overspend.select(event.budget_ratio).factor;
    let amount_penalty = tables.model.amount.select(event.amount).factor;

    let adjusted = base_coins as f64 * category_priority * overspend_penalty * amount_penalty;

    Adjustment {
        category_priority,
        overspend_penalty,
        amount_penalty,
        final_coins: clamp_coins(adjusted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::PolicyTables;

    fn event(category: &str, amount: f64, budget_ratio: f64) -> ExpenseEvent {
        ExpenseEvent {
            amount,
            category: category.to_string(),
            timestamp: "2026-03-14T12:00:00Z".to_string(),
            spending_velocity: 1.0,
            category_frequency: 0.5,
            budget_ratio,
        }
    }

    #[test]
    fn test_clamp_coins_bounds() {
        assert_eq!(clamp_coins(-3.0), 1);
        assert_eq!(clamp_coins(0.4), 1);
        assert_eq!(clamp_coins(1.0), 1);
        assert_eq!(clamp_coins(17.9), 17);
        assert_eq!(clamp_coins(50.0), 50);
        assert_eq!(clamp_coins(8000.0), 50);
        assert_eq!(clamp_coins(f64::NAN), 1);
    }

    #[test]
    fn test_healthcare_within_budget_untouched() {
        let tables = PolicyTables::embedded().unwrap();
        // Priority 1.0, ratio within budget, small amount: all factors 1.0
        let adj = apply(&tables, &event("healthcare", 30.0, 0.5), 20);
        assert_eq!(adj.category_priority, 1.0);
        assert_eq!(adj.overspend_penalty, 1.0);
        assert_eq!(adj.amount_penalty, 1.0);
        assert_eq!(adj.final_coins, 20);
    }

    #[test]
    fn test_compound_penalties_floor_at_one() {
        let tables = PolicyTables::embedded().unwrap();
        // entertainment 0.2 * severe 0.2 * large amount 0.5 = 0.02
        let adj = apply(&tables, &event("entertainment", 500.0, 1.5), 20);
        assert_eq!(adj.final_coins, 1);
    }

    #[test]
    fn test_unknown_category_uses_default_priority() {
        let tables = PolicyTables::embedded().unwrap();
        let adj = apply(&tables, &event("cryptocurrency", 10.0, 0.5), 20);
        assert_eq!(adj.category_priority, 0.5);
        assert_eq!(adj.final_coins, 10);
    }

    #[test]
    fn test_result_never_escapes_range() {
        let tables = PolicyTables::embedded().unwrap();
        for base in [1, 10, 25, 50] {
            for amount in [0.0, 20.0, 60.0, 150.0, 500.0] {
                for ratio in [0.0, 0.5, 0.9, 1.1, 2.0] {
                    let adj = apply(&tables, &event("shopping", amount, ratio), base);
                    assert!((1..=50).contains(&adj.final_coins));
                }
            }
        }
    }
}
