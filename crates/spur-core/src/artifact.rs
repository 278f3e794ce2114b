//! Model artifact loading
//!
//! The offline training pipeline exports a single JSON document holding
//! everything inference needs: the category vocabulary the label encoder
//! was fitted on, the standard-scaler statistics, and the dense layer
//! weights. The engine loads it once at startup; a missing artifact is
//! not an error, it simply leaves the predictor unavailable for the
//! process lifetime.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::features::FEATURE_LEN;

/// Environment variable naming an explicit artifact file
pub const MODEL_PATH_ENV: &str = "SPUR_MODEL_PATH";

/// Per-feature standardization statistics (fitted mean and standard
/// deviation).
#[derive(Debug, Clone, Deserialize)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub std: Vec<f64>,
}

impl Scaler {
    /// Standardize a raw feature slice.
    pub fn transform(&self, input: &[f64]) -> Vec<f64> {
        input
            .iter()
            .zip(self.mean.iter().zip(&self.std))
            .map(|(x, (mean, std))| (x - mean) / std)
            .collect()
    }
}

/// Activation applied after a dense layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
    Relu,
    Linear,
}

/// One dense layer: `weights[out][in]`, one bias per output unit.
#[derive(Debug, Clone, Deserialize)]
pub struct DenseLayer {
    pub weights: Vec<Vec<f64>>,
    pub bias: Vec<f64>,
    pub activation: Activation,
}

impl DenseLayer {
    pub fn output_len(&self) -> usize {
        self.weights.len()
    }

    pub fn input_len(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }
}

/// The trained reward regressor as exported for inference.
#[derive(Debug, Clone, Deserialize)]
pub struct RewardModelArtifact {
    pub version: u32,
    /// Categories the label encoder was fitted on
    pub vocabulary: Vec<String>,
    pub scaler: Scaler,
    pub layers: Vec<DenseLayer>,
}

impl RewardModelArtifact {
    /// Parse and shape-check an artifact document.
    pub fn from_json(input: &str) -> Result<Self> {
        let artifact: RewardModelArtifact = serde_json::from_str(input)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Read and parse an artifact file.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading model artifact");
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Locate the artifact file: explicit path, then `SPUR_MODEL_PATH`,
    /// then the platform data directory. Returns `None` when nothing is
    /// configured or present, which callers treat as "no model".
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(MODEL_PATH_ENV) {
            if !path.is_empty() {
                return Some(PathBuf::from(path));
            }
        }

        let candidate = dirs::data_dir()?
            .join("spur")
            .join("model")
            .join("reward_model.json");
        if candidate.exists() {
            Some(candidate)
        } else {
            None
        }
    }

    fn validate(&self) -> Result<()> {
        if self.vocabulary.is_empty() {
            return Err(Error::Artifact("empty vocabulary".into()));
        }

        if self.scaler.mean.len() != FEATURE_LEN || self.scaler.std.len() != FEATURE_LEN {
            return Err(Error::Artifact(format!(
                "scaler expects {} features, got mean={} std={}",
                FEATURE_LEN,
                self.scaler.mean.len(),
                self.scaler.std.len()
            )));
        }
        for (i, std) in self.scaler.std.iter().enumerate() {
            if !std.is_finite() || *std <= 0.0 {
                return Err(Error::Artifact(format!(
                    "scaler std[{}] = {} is not positive",
                    i, std
                )));
            }
        }
        for (i, mean) in self.scaler.mean.iter().enumerate() {
            if !mean.is_finite() {
                return Err(Error::Artifact(format!("scaler mean[{}] is not finite", i)));
            }
        }

        if self.layers.is_empty() {
            return Err(Error::Artifact("no layers".into()));
        }

        let mut expected_input = FEATURE_LEN;
        for (i, layer) in self.layers.iter().enumerate() {
            if layer.weights.is_empty() {
                return Err(Error::Artifact(format!("layer {}: no output units", i)));
            }
            for (j, row) in layer.weights.iter().enumerate() {
                if row.len() != expected_input {
                    return Err(Error::Artifact(format!(
                        "layer {} unit {}: expected {} inputs, got {}",
                        i,
                        j,
                        expected_input,
                        row.len()
                    )));
                }
            }
            if layer.bias.len() != layer.output_len() {
                return Err(Error::Artifact(format!(
                    "layer {}: {} bias values for {} units",
                    i,
                    layer.bias.len(),
                    layer.output_len()
                )));
            }
            expected_input = layer.output_len();
        }

        if expected_input != 1 {
            return Err(Error::Artifact(format!(
                "final layer must have a single output, got {}",
                expected_input
            )));
        }

        Ok(())
    }
}
