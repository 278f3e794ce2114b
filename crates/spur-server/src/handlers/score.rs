//! Scoring handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::{AppError, AppState};
use spur_core::{ExpenseEvent, RewardResult};

/// Response for the smoke-test endpoint
#[derive(Debug, Serialize)]
pub struct TestResponse {
    pub sample_input: ExpenseEvent,
    pub prediction: RewardResult,
}

/// POST /predict-coins - Score one expense event
///
/// Malformed bodies and bad required fields come back as 400 with an
/// `error` message; every internal scoring failure is absorbed by the
/// engine and still yields a well-formed result.
pub async fn predict_coins(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExpenseEvent>, JsonRejection>,
) -> Result<Json<RewardResult>, AppError> {
    let Json(event) = payload.map_err(|e| AppError::bad_request(&e.body_text()))?;

    let result = state.engine.score(&event)?;
    Ok(Json(result))
}

/// GET /test - Score a fixed sample event
///
/// Useful as a smoke test: returns both the input and the result.
pub async fn test_prediction(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TestResponse>, AppError> {
    let sample_input = ExpenseEvent {
        amount: 25.50,
        category: "food".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        spending_velocity: 2.0,
        category_frequency: 0.3,
        budget_ratio: 0.4,
    };

    let prediction = state.engine.score(&sample_input)?;

    Ok(Json(TestResponse {
        sample_input,
        prediction,
    }))
}
