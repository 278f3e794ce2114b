//! Spur Core Library
//!
//! Shared functionality for the Spur reward scoring service:
//! - Expense event and reward result types
//! - Canonical policy tables with override resolution
//! - Feature extraction for the learned regressor
//! - Predictor port with a dense-network artifact backend
//! - Deterministic rule-based fallback scoring
//! - Factor analysis and confidence labelling
//! - The scoring facade tying the paths together

pub mod adjust;
pub mod analysis;
pub mod artifact;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod features;
pub mod models;
pub mod policy;
pub mod predictor;

pub use analysis::ScoringPath;
pub use artifact::{Activation, DenseLayer, RewardModelArtifact, Scaler};
pub use engine::RewardEngine;
pub use error::{Error, Result};
pub use features::{CategoryEncoder, FeatureVector, FEATURE_LEN, FEATURE_NAMES};
pub use models::{
    Breakdown, Confidence, ExpenseEvent, Factors, RewardResult, ScoringMethod, MAX_COINS,
    MIN_COINS,
};
pub use policy::{CategoryPolicy, LuxuryClass, PolicyTables, Tier, TierTable};
pub use predictor::{
    DenseRegressor, FailingRegressor, FixedRegressor, Predictor, PredictorOutcome, Regressor,
};
