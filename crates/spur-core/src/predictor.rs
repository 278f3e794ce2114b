//! Predictor port over the optional learned regressor
//!
//! The engine talks to the model through the [`Regressor`] trait; the
//! port itself is either `Available` with a loaded artifact or
//! permanently `Unavailable`. A port that failed to initialize never
//! retries within the process lifetime.
//!
//! Implementations must be safe for arbitrary concurrent calls; one
//! that is not must serialize internally (e.g. behind a mutex) rather
//! than leak the constraint through the port.

use tracing::debug;

use crate::artifact::{Activation, DenseLayer, RewardModelArtifact, Scaler};
use crate::error::{Error, Result};
use crate::features::FeatureVector;

/// Inference interface the scoring engine depends on.
pub trait Regressor: Send + Sync {
    /// Produce a raw reward estimate for one feature vector.
    ///
    /// Fails with [`Error::Inference`] for any runtime fault in the
    /// underlying model.
    fn predict(&self, features: &FeatureVector) -> Result<f64>;
}

/// The predictor port: a loaded regressor or a permanent absence.
pub enum Predictor {
    Available(Box<dyn Regressor>),
    Unavailable,
}

/// Tagged outcome of a single predict attempt.
///
/// Makes the fallback transition a first-class branch instead of
/// implicit error flow.
#[derive(Debug)]
pub enum PredictorOutcome {
    /// The regressor produced a raw estimate
    Estimate(f64),
    /// No regressor was ever loaded
    Unavailable,
    /// The regressor was asked and failed
    Failed(Error),
}

impl Predictor {
    /// Wrap a loaded artifact in the bundled dense regressor.
    pub fn from_artifact(artifact: RewardModelArtifact) -> Self {
        Predictor::Available(Box::new(DenseRegressor::new(artifact)))
    }

    /// Wrap any regressor implementation.
    pub fn from_regressor(regressor: Box<dyn Regressor>) -> Self {
        Predictor::Available(regressor)
    }

    pub fn unavailable() -> Self {
        Predictor::Unavailable
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Predictor::Available(_))
    }

    /// Run one predict attempt. Total: every failure mode is a tagged
    /// outcome, never a panic or propagated error.
    pub fn predict(&self, features: &FeatureVector) -> PredictorOutcome {
        match self {
            Predictor::Unavailable => PredictorOutcome::Unavailable,
            Predictor::Available(regressor) => match regressor.predict(features) {
                Ok(estimate) => PredictorOutcome::Estimate(estimate),
                Err(e) => PredictorOutcome::Failed(e),
            },
        }
    }
}

/// Dense feed-forward regressor backed by a loaded artifact.
///
/// Standardizes the input with the artifact's scaler, then runs the
/// layer chain. Pure math over read-only weights, so concurrent calls
/// need no synchronization.
pub struct DenseRegressor {
    scaler: Scaler,
    layers: Vec<DenseLayer>,
}

impl DenseRegressor {
    pub fn new(artifact: RewardModelArtifact) -> Self {
        debug!(
            layers = artifact.layers.len(),
            vocabulary = artifact.vocabulary.len(),
            "Dense regressor ready"
        );
        Self {
            scaler: artifact.scaler,
            layers: artifact.layers,
        }
    }
}

impl Regressor for DenseRegressor {
    fn predict(&self, features: &FeatureVector) -> Result<f64> {
        let mut activations = self.scaler.transform(features.as_slice());

        for (i, layer) in self.layers.iter().enumerate() {
            activations = forward(layer, &activations).map_err(|e| {
                Error::Inference(format!("layer {}: {}", i, e))
            })?;
        }

        match activations.as_slice() {
            [output] if output.is_finite() => Ok(*output),
            [output] => Err(Error::Inference(format!(
                "non-finite model output: {}",
                output
            ))),
            other => Err(Error::Inference(format!(
                "expected a single output, got {}",
                other.len()
            ))),
        }
    }
}

/// One dense layer pass: `out = activation(W x + b)`.
fn forward(layer: &DenseLayer, input: &[f64]) -> std::result::Result<Vec<f64>, String> {
    let mut output = Vec::with_capacity(layer.output_len());

    for (row, bias) in layer.weights.iter().zip(&layer.bias) {
        if row.len() != input.len() {
            return Err(format!(
                "shape mismatch: {} weights for {} inputs",
                row.len(),
                input.len()
            ));
        }
        let mut sum = *bias;
        for (w, x) in row.iter().zip(input) {
            sum += w * x;
        }
        output.push(match layer.activation {
            Activation::Relu => sum.max(0.0),
            Activation::Linear => sum,
        });
    }

    Ok(output)
}

/// Regressor that always returns the same estimate. Test double.
pub struct FixedRegressor(pub f64);

impl Regressor for FixedRegressor {
    fn predict(&self, _features: &FeatureVector) -> Result<f64> {
        Ok(self.0)
    }
}

/// Regressor that always fails. Test double for the fallback path.
pub struct FailingRegressor;

impl Regressor for FailingRegressor {
    fn predict(&self, _features: &FeatureVector) -> Result<f64> {
        Err(Error::Inference("simulated model fault".into()))
    }
}
