//! Error types for Spur

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed event: {0}")]
    MalformedEvent(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Inference error: {0}")]
    Inference(String),

    #[error("Predictor unavailable")]
    PredictorUnavailable,

    #[error("Model artifact error: {0}")]
    Artifact(String),

    #[error("Policy table error: {0}")]
    Policy(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
