//! Spur Web Server
//!
//! Axum-based REST API for the Spur reward scoring engine.
//!
//! The engine is constructed once at startup and shared read-only with
//! every request worker; handlers hold no state of their own. Scoring
//! requests are independent, so the server imposes no locking and no
//! internal timeouts.

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use spur_core::RewardEngine;

mod handlers;

#[cfg(test)]
mod tests;

/// Server configuration
#[derive(Clone, Default)]
pub struct ServerConfig {
    /// Allowed CORS origins (empty = same-origin only)
    pub allowed_origins: Vec<String>,
}

/// Shared application state
pub struct AppState {
    pub engine: RewardEngine,
    pub config: ServerConfig,
}

/// Create the application router
pub fn create_router(engine: RewardEngine, config: ServerConfig) -> Router {
    let state = Arc::new(AppState {
        engine,
        config: config.clone(),
    });

    // Build CORS layer
    let cors = if config.allowed_origins.is_empty() {
        // Restrictive default: only allow same-origin
        CorsLayer::new()
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    } else {
        let origins: Vec<HeaderValue> = config
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
    };

    Router::new()
        .route("/predict-coins", post(handlers::predict_coins))
        .route("/health", get(handlers::health))
        .route("/categories", get(handlers::categories))
        .route("/test", get(handlers::test_prediction))
        .route("/retrain", post(handlers::retrain))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the server
pub async fn serve(
    engine: RewardEngine,
    host: &str,
    port: u16,
    config: ServerConfig,
) -> anyhow::Result<()> {
    if engine.model_loaded() {
        info!(
            vocabulary = engine.encoder().len(),
            "✅ Model artifact loaded; predictor path active"
        );
    } else {
        info!("ℹ️  No model artifact; scoring via fallback rules only");
    }
    info!(
        policy_version = engine.tables().version,
        categories = engine.tables().category_names().len(),
        "Policy tables ready"
    );

    let app = create_router(engine, config);
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<spur_core::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_implemented(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_IMPLEMENTED,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<spur_core::Error> for AppError {
    fn from(err: spur_core::Error) -> Self {
        match err {
            spur_core::Error::MalformedEvent(msg) => Self::bad_request(&msg),
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                // Return generic message to client
                message: "An internal error occurred".to_string(),
                // Keep full error for logging
                internal: Some(other),
            },
        }
    }
}
