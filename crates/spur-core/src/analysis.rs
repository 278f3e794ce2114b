//! Explanation factors and confidence labels
//!
//! Both are descriptive metadata layered onto a finished score; neither
//! ever feeds back into the coin computation.

use crate::models::{Confidence, ExpenseEvent, Factors};
use crate::policy::PolicyTables;

/// Amount below which a single transaction is considered reasonable.
const REASONABLE_AMOUNT: f64 = 100.0;

/// Budget ratio below which spending counts as within budget.
const HEALTHY_BUDGET_RATIO: f64 = 0.8;

/// Appropriate spending window, inclusive hours.
const SPENDING_WINDOW: (u32, u32) = (6, 22);

/// Which path produced the result being labelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringPath {
    /// Learned regressor succeeded
    Model,
    /// Rule tables produced the score
    Fallback,
    /// Even the rule tables failed; minimal safe result
    Degraded,
}

/// Derive the boolean explanation flags for one scored event.
pub fn analyze(tables: &PolicyTables, event: &ExpenseEvent, hour: u32) -> Factors {
    Factors {
        category_health: tables.category(&event.category).healthy,
        amount_reasonable: event.amount < REASONABLE_AMOUNT,
        time_appropriate: hour >= SPENDING_WINDOW.0 && hour <= SPENDING_WINDOW.1,
        within_budget: event.budget_ratio < HEALTHY_BUDGET_RATIO,
        error: false,
    }
}

/// Factors for the minimal safe result.
pub fn degraded_factors() -> Factors {
    Factors {
        category_health: false,
        amount_reasonable: false,
        time_appropriate: false,
        within_budget: false,
        error: true,
    }
}

/// Map the scoring path to a confidence label. Total.
///
/// Both live paths report medium; high and low are reserved for future
/// model-uncertainty signals, except that a degraded result is always
/// low.
pub fn confidence(path: ScoringPath) -> Confidence {
    match path {
        ScoringPath::Model => Confidence::Medium,
        ScoringPath::Fallback => Confidence::Medium,
        ScoringPath::Degraded => Confidence::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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
    fn test_factors_for_healthy_spend() {
        let tables = PolicyTables::embedded().unwrap();
        let factors = analyze(&tables, &event("food", 25.50, 0.4), 12);

        assert!(factors.category_health);
        assert!(factors.amount_reasonable);
        assert!(factors.time_appropriate);
        assert!(factors.within_budget);
        assert!(!factors.error);
    }

    #[test]
    fn test_factors_for_late_night_splurge() {
        let tables = PolicyTables::embedded().unwrap();
        let factors = analyze(&tables, &event("entertainment", 250.0, 1.3), 2);

        assert!(!factors.category_health);
        assert!(!factors.amount_reasonable);
        assert!(!factors.time_appropriate);
        assert!(!factors.within_budget);
    }

    #[test]
    fn test_spending_window_edges() {
        let tables = PolicyTables::embedded().unwrap();
        let e = event("food", 10.0, 0.4);

        assert!(analyze(&tables, &e, 6).time_appropriate);
        assert!(analyze(&tables, &e, 22).time_appropriate);
        assert!(!analyze(&tables, &e, 5).time_appropriate);
        assert!(!analyze(&tables, &e, 23).time_appropriate);
    }

    #[test]
    fn test_confidence_is_total() {
        assert_eq!(confidence(ScoringPath::Model), Confidence::Medium);
        assert_eq!(confidence(ScoringPath::Fallback), Confidence::Medium);
        assert_eq!(confidence(ScoringPath::Degraded), Confidence::Low);
    }

    #[test]
    fn test_degraded_factors_flag_error() {
        let factors = degraded_factors();
        assert!(factors.error);
        assert!(!factors.within_budget);
    }
}
