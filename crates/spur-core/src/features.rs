//! Feature extraction for the learned regressor
//!
//! Maps a raw expense event to the fixed-order numeric vector the
//! trained artifact was fitted against. The slot order is a contract:
//! changing it invalidates any existing artifact.

use chrono::{Datelike, Timelike};

use crate::error::{Error, Result};
use crate::models::ExpenseEvent;

/// Number of feature slots.
pub const FEATURE_LEN: usize = 8;

/// Canonical slot names, in vector order.
pub const FEATURE_NAMES: [&str; FEATURE_LEN] = [
    "amount",
    "category_code",
    "hour_of_day",
    "day_of_week",
    "month",
    "spending_velocity",
    "category_frequency",
    "budget_ratio",
];

/// Fixed-order feature vector handed to the predictor port.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector([f64; FEATURE_LEN]);

impl FeatureVector {
    pub fn new(values: [f64; FEATURE_LEN]) -> Self {
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

/// Maps category names to the integer codes the regressor was trained
/// with: position in the sorted, deduplicated vocabulary.
#[derive(Debug, Clone)]
pub struct CategoryEncoder {
    vocabulary: Vec<String>,
}

impl CategoryEncoder {
    pub fn new(mut vocabulary: Vec<String>) -> Self {
        vocabulary.sort();
        vocabulary.dedup();
        Self { vocabulary }
    }

    /// Encode a category name, failing for anything outside the
    /// vocabulary.
    pub fn encode(&self, category: &str) -> Result<usize> {
        self.vocabulary
            .binary_search_by(|v| v.as_str().cmp(category))
            .map_err(|_| Error::UnknownCategory(category.to_string()))
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vocabulary.is_empty()
    }
}

/// Vectorize one event.
///
/// Pure: output depends only on the event and the encoder. Fails with
/// `MalformedEvent` for an unparseable timestamp and `UnknownCategory`
/// for a category outside the encoder vocabulary.
pub fn extract(event: &ExpenseEvent, encoder: &CategoryEncoder) -> Result<FeatureVector> {
    let ts = event.parsed_timestamp()?;
    let category_code = encoder.encode(&event.category)? as f64;

    Ok(FeatureVector([
        event.amount,
        category_code,
        ts.hour() as f64,
        // Monday = 0, matching the training convention
        ts.weekday().num_days_from_monday() as f64,
        ts.month() as f64,
        event.spending_velocity,
        event.category_frequency,
        event.budget_ratio,
    ]))
}
