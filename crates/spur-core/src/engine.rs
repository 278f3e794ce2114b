//! Scoring facade
//!
//! One explicitly constructed service object holds the predictor port,
//! the category encoder, and the policy tables; request handlers borrow
//! it and call [`RewardEngine::score`]. Each request makes exactly one
//! pass through TryModel -> Fallback -> MinimalSafeResult, and the
//! terminal state always yields a well-formed result.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::analysis::{self, ScoringPath};
use crate::artifact::RewardModelArtifact;
use crate::error::{Error, Result};
use crate::features::{self, CategoryEncoder};
use crate::models::{Breakdown, ExpenseEvent, RewardResult, MIN_COINS};
use crate::policy::PolicyTables;
use crate::predictor::{Predictor, PredictorOutcome};
use crate::{adjust, fallback};

/// The reward scoring engine.
///
/// All held state is read-only after construction, so one engine can be
/// shared across request workers without locking.
pub struct RewardEngine {
    predictor: Predictor,
    encoder: CategoryEncoder,
    tables: PolicyTables,
}

impl RewardEngine {
    pub fn new(predictor: Predictor, encoder: CategoryEncoder, tables: PolicyTables) -> Self {
        Self {
            predictor,
            encoder,
            tables,
        }
    }

    /// Engine with no model: every request takes the fallback path.
    pub fn fallback_only(tables: PolicyTables) -> Self {
        let encoder = CategoryEncoder::new(tables.category_names());
        Self::new(Predictor::unavailable(), encoder, tables)
    }

    /// Standard startup assembly: load policy tables, then try to load
    /// a model artifact from `model_path` (or the default resolution
    /// chain). A missing artifact is normal; a malformed one is logged
    /// and degrades to the fallback-only engine rather than aborting.
    pub fn bootstrap(model_path: Option<&Path>) -> Result<Self> {
        let tables = PolicyTables::load()?;

        let Some(path) = RewardModelArtifact::resolve_path(model_path) else {
            info!("No model artifact configured; scoring via fallback rules");
            return Ok(Self::fallback_only(tables));
        };

        match RewardModelArtifact::load(&path) {
            Ok(artifact) => {
                info!(
                    path = %path.display(),
                    layers = artifact.layers.len(),
                    vocabulary = artifact.vocabulary.len(),
                    "Model artifact loaded"
                );
                let encoder = CategoryEncoder::new(artifact.vocabulary.clone());
                Ok(Self::new(
                    Predictor::from_artifact(artifact),
                    encoder,
                    tables,
                ))
            }
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to load model artifact; scoring via fallback rules"
                );
                Ok(Self::fallback_only(tables))
            }
        }
    }

    /// Whether a regressor is loaded (health endpoint).
    pub fn model_loaded(&self) -> bool {
        self.predictor.is_available()
    }

    pub fn tables(&self) -> &PolicyTables {
        &self.tables
    }

    pub fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }

    /// Score one expense event.
    ///
    /// The only error surfaced to callers is `MalformedEvent` (bad
    /// required field); every predictor-path failure is absorbed by the
    /// fallback rules, and a fallback failure degrades to the minimal
    /// safe result.
    pub fn score(&self, event: &ExpenseEvent) -> Result<RewardResult> {
        event.validate()?;
        let hour = chrono::Timelike::hour(&event.parsed_timestamp()?);

        match self.try_model(event) {
            PredictorOutcome::Estimate(raw) => Ok(self.model_result(event, hour, raw)),
            PredictorOutcome::Unavailable => {
                debug!("Predictor unavailable, using fallback rules");
                Ok(self.fallback_result(event, hour))
            }
            PredictorOutcome::Failed(Error::UnknownCategory(ref category)) => {
                debug!(
                    category = %category,
                    "Category outside model vocabulary, using fallback rules"
                );
                Ok(self.fallback_result(event, hour))
            }
            PredictorOutcome::Failed(e) => {
                warn!(error = %e, "Predictor failed, using fallback rules");
                Ok(self.fallback_result(event, hour))
            }
        }
    }

    /// TryModel state: vectorize, then ask the port. Extraction errors
    /// surface as `Failed` so the transition to Fallback is uniform.
    fn try_model(&self, event: &ExpenseEvent) -> PredictorOutcome {
        if !self.predictor.is_available() {
            return PredictorOutcome::Unavailable;
        }

        match features::extract(event, &self.encoder) {
            Ok(fv) => self.predictor.predict(&fv),
            Err(e) => PredictorOutcome::Failed(e),
        }
    }

    fn model_result(&self, event: &ExpenseEvent, hour: u32, raw: f64) -> RewardResult {
        let base_coins = adjust::clamp_coins(raw);
        let adj = adjust::apply(&self.tables, event, base_coins);

        debug!(
            raw,
            base_coins,
            final_coins = adj.final_coins,
            "Model estimate adjusted"
        );

        RewardResult {
            coins: adj.final_coins,
            confidence: analysis::confidence(ScoringPath::Model),
            factors: analysis::analyze(&self.tables, event, hour),
            breakdown: Breakdown::Model {
                base_prediction: raw,
                base_coins,
                category_priority: adj.category_priority,
                overspend_penalty: adj.overspend_penalty,
                amount_penalty: adj.amount_penalty,
                final_coins: adj.final_coins,
            },
        }
    }

    fn fallback_result(&self, event: &ExpenseEvent, hour: u32) -> RewardResult {
        match fallback::score(&self.tables, event) {
            Ok(score) => RewardResult {
                coins: score.coins,
                confidence: analysis::confidence(ScoringPath::Fallback),
                factors: analysis::analyze(&self.tables, event, hour),
                breakdown: Breakdown::Fallback {
                    base_coins: score.base_coins,
                    budget_multiplier: score.budget_multiplier,
                    spending_tag: score.spending_tag,
                    amount_modifier: score.amount_modifier,
                    luxury_penalty: score.luxury_penalty,
                    final_coins: score.coins,
                },
            },
            Err(e) => {
                warn!(error = %e, "Fallback scoring failed, returning minimal safe result");
                Self::minimal_safe_result()
            }
        }
    }

    /// Terminal degradation: the engine never leaves a request
    /// unanswered.
    fn minimal_safe_result() -> RewardResult {
        RewardResult {
            coins: MIN_COINS,
            confidence: analysis::confidence(ScoringPath::Degraded),
            factors: analysis::degraded_factors(),
            breakdown: Breakdown::Fallback {
                base_coins: MIN_COINS,
                budget_multiplier: 1.0,
                spending_tag: "scoring_error".to_string(),
                amount_modifier: 1.0,
                luxury_penalty: 1.0,
                final_coins: MIN_COINS,
            },
        }
    }
}
