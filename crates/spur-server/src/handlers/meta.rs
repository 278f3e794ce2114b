//! Health and metadata handlers

use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::{AppError, AppState};

/// Response for GET /health
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    /// Whether the predictor port holds a loaded regressor
    pub model_loaded: bool,
    pub policy_version: u32,
    pub endpoints: Vec<&'static str>,
}

/// Response for GET /categories
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

/// GET /health - Service and predictor status
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        model_loaded: state.engine.model_loaded(),
        policy_version: state.engine.tables().version,
        endpoints: vec!["/predict-coins", "/health", "/test", "/categories"],
    })
}

/// GET /categories - Known category vocabulary
pub async fn categories(State(state): State<Arc<AppState>>) -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: state.engine.tables().category_names(),
    })
}

/// POST /retrain - Not implemented
///
/// Retraining belongs to the offline pipeline that produces model
/// artifacts; the serving process never mutates the loaded model.
pub async fn retrain() -> AppError {
    AppError::not_implemented("retraining is not implemented")
}
