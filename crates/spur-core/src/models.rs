//! Core data types for reward scoring

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Lowest coin value the engine will ever return.
pub const MIN_COINS: u32 = 1;

/// Highest coin value the engine will ever return.
pub const MAX_COINS: u32 = 50;

/// A single logged spending event, as submitted by a client.
///
/// Constructed per request and never persisted by the engine. The three
/// behavioral floats are optional on the wire and default to neutral
/// values when omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseEvent {
    /// Transaction amount (non-negative)
    pub amount: f64,
    /// Spending category, drawn from a known-but-open vocabulary
    pub category: String,
    /// ISO-8601 timestamp of the transaction
    pub timestamp: String,
    /// Short-term spending rate relative to the user's norm
    #[serde(default = "default_velocity")]
    pub spending_velocity: f64,
    /// Share of recent transactions in this category, in [0, 1]
    #[serde(default = "default_frequency")]
    pub category_frequency: f64,
    /// Cumulative category spend relative to its budget (> 1.0 means overspent)
    #[serde(default = "default_budget_ratio")]
    pub budget_ratio: f64,
}

fn default_velocity() -> f64 {
    1.0
}

fn default_frequency() -> f64 {
    0.5
}

fn default_budget_ratio() -> f64 {
    0.5
}

impl ExpenseEvent {
    /// Parse the wire timestamp as an ISO-8601 instant (`Z` suffix accepted).
    pub fn parsed_timestamp(&self) -> Result<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).map_err(|e| {
            Error::MalformedEvent(format!("invalid timestamp {:?}: {}", self.timestamp, e))
        })
    }

    /// Validate the required fields.
    ///
    /// This is the only check whose failure is surfaced to the caller;
    /// everything downstream degrades internally instead of erroring.
    pub fn validate(&self) -> Result<()> {
        if !self.amount.is_finite() {
            return Err(Error::MalformedEvent("amount must be a finite number".into()));
        }
        if self.amount < 0.0 {
            return Err(Error::MalformedEvent("amount must be non-negative".into()));
        }
        self.parsed_timestamp()?;
        Ok(())
    }
}

/// Coarse indicator of how much to trust a RewardResult.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

/// Which scoring path produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringMethod {
    /// The learned regressor produced the base estimate
    Model,
    /// The deterministic rule tables produced the score
    Fallback,
}

impl ScoringMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMethod::Model => "model",
            ScoringMethod::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ScoringMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Boolean explanation flags derived from the input and final score.
///
/// Descriptive metadata only: nothing here feeds back into the coin
/// computation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Factors {
    /// Category belongs to the healthy set in the policy tables
    pub category_health: bool,
    /// Amount is below the reasonableness threshold
    pub amount_reasonable: bool,
    /// Transaction hour falls inside the appropriate spending window
    pub time_appropriate: bool,
    /// Budget ratio is inside the healthy band
    pub within_budget: bool,
    /// Set only on the degraded minimal-safe result
    #[serde(default, skip_serializing_if = "is_false")]
    pub error: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Structured trace of the intermediate scoring values.
///
/// Serializes with a `method` tag so every result names the path that
/// produced it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", rename_all = "snake_case")]
pub enum Breakdown {
    Model {
        /// Raw regressor output before clamping
        base_prediction: f64,
        /// Clamped base estimate the adjustments start from
        base_coins: u32,
        category_priority: f64,
        overspend_penalty: f64,
        amount_penalty: f64,
        final_coins: u32,
    },
    Fallback {
        /// Category base value from the policy tables
        base_coins: u32,
        budget_multiplier: f64,
        /// Human-readable budget tier tag (e.g. "near_budget_limit")
        spending_tag: String,
        amount_modifier: f64,
        luxury_penalty: f64,
        final_coins: u32,
    },
}

impl Breakdown {
    pub fn method(&self) -> ScoringMethod {
        match self {
            Breakdown::Model { .. } => ScoringMethod::Model,
            Breakdown::Fallback { .. } => ScoringMethod::Fallback,
        }
    }
}

/// The reward produced for one expense event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RewardResult {
    /// Awarded coins, always in [MIN_COINS, MAX_COINS]
    pub coins: u32,
    pub confidence: Confidence,
    pub factors: Factors,
    pub breakdown: Breakdown,
}
