//! Server API tests

use super::*;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use tower::ServiceExt;

use spur_core::{
    CategoryEncoder, FailingRegressor, FixedRegressor, PolicyTables, Predictor, RewardEngine,
};

fn fallback_app() -> Router {
    let engine = RewardEngine::fallback_only(PolicyTables::embedded().unwrap());
    create_router(engine, ServerConfig::default())
}

fn app_with_regressor(regressor: Box<dyn spur_core::Regressor>) -> Router {
    let tables = PolicyTables::embedded().unwrap();
    let encoder = CategoryEncoder::new(tables.category_names());
    let engine = RewardEngine::new(Predictor::from_regressor(regressor), encoder, tables);
    create_router(engine, ServerConfig::default())
}

async fn get_body_json(response: axum::response::Response) -> serde_json::Value {
    let body = response.into_body();
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn predict_request(body: &serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict-coins")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn sample_body() -> serde_json::Value {
    serde_json::json!({
        "amount": 25.50,
        "category": "food",
        "timestamp": "2026-03-14T12:30:00Z",
        "spending_velocity": 2.0,
        "category_frequency": 0.3,
        "budget_ratio": 0.4
    })
}

// ========== Scoring API Tests ==========

#[tokio::test]
async fn test_predict_coins_fallback() {
    let app = fallback_app();

    let response = app.oneshot(predict_request(&sample_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let coins = json["coins"].as_u64().unwrap();
    assert!((1..=50).contains(&coins));
    assert_eq!(json["confidence"], "medium");
    assert_eq!(json["factors"]["within_budget"], true);
    assert_eq!(json["breakdown"]["method"], "fallback");
}

#[tokio::test]
async fn test_predict_coins_model_path() {
    let app = app_with_regressor(Box::new(FixedRegressor(20.0)));

    let response = app.oneshot(predict_request(&sample_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["breakdown"]["method"], "model");
    assert_eq!(json["breakdown"]["base_coins"], 20);
}

#[tokio::test]
async fn test_inference_failure_reports_fallback_method() {
    let app = app_with_regressor(Box::new(FailingRegressor));

    let response = app.oneshot(predict_request(&sample_body())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["breakdown"]["method"], "fallback");
}

#[tokio::test]
async fn test_predict_coins_defaults_optional_fields() {
    let app = fallback_app();

    let body = serde_json::json!({
        "amount": 12.0,
        "category": "utilities",
        "timestamp": "2026-03-14T08:00:00Z"
    });

    let response = app.oneshot(predict_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    // budget_ratio defaults to 0.5: within budget
    assert_eq!(json["factors"]["within_budget"], true);
}

#[tokio::test]
async fn test_predict_coins_unknown_category() {
    let app = fallback_app();

    let mut body = sample_body();
    body["category"] = serde_json::json!("cryptocurrency");

    let response = app.oneshot(predict_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["breakdown"]["base_coins"], 6);
}

#[tokio::test]
async fn test_predict_coins_missing_amount() {
    let app = fallback_app();

    let body = serde_json::json!({
        "category": "food",
        "timestamp": "2026-03-14T12:30:00Z"
    });

    let response = app.oneshot(predict_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json.get("error").is_some());
}

#[tokio::test]
async fn test_predict_coins_negative_amount() {
    let app = fallback_app();

    let mut body = sample_body();
    body["amount"] = serde_json::json!(-10.0);

    let response = app.oneshot(predict_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = get_body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn test_predict_coins_bad_timestamp() {
    let app = fallback_app();

    let mut body = sample_body();
    body["timestamp"] = serde_json::json!("yesterday at noon");

    let response = app.oneshot(predict_request(&body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_predict_coins_severe_overspend() {
    let app = fallback_app();

    let body = serde_json::json!({
        "amount": 500.0,
        "category": "entertainment",
        "timestamp": "2026-03-14T23:30:00Z",
        "budget_ratio": 1.5
    });

    let response = app.oneshot(predict_request(&body)).await.unwrap();
    let json = get_body_json(response).await;

    let coins = json["coins"].as_u64().unwrap();
    assert!(coins <= 2);
    assert_eq!(json["breakdown"]["spending_tag"], "severe_overspending");
}

// ========== Metadata API Tests ==========

#[tokio::test]
async fn test_health() {
    let app = fallback_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["model_loaded"], false);
    assert_eq!(json["policy_version"], 1);
}

#[tokio::test]
async fn test_health_reflects_loaded_model() {
    let app = app_with_regressor(Box::new(FixedRegressor(15.0)));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let json = get_body_json(response).await;
    assert_eq!(json["model_loaded"], true);
}

#[tokio::test]
async fn test_categories() {
    let app = fallback_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/categories")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    let categories = json["categories"].as_array().unwrap();
    assert_eq!(categories.len(), 10);
    assert!(categories.contains(&serde_json::json!("food")));
    assert!(categories.contains(&serde_json::json!("entertainment")));
}

#[tokio::test]
async fn test_test_endpoint() {
    let app = fallback_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/test")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = get_body_json(response).await;
    assert_eq!(json["sample_input"]["category"], "food");
    let coins = json["prediction"]["coins"].as_u64().unwrap();
    assert!((1..=50).contains(&coins));
}

#[tokio::test]
async fn test_retrain_not_implemented() {
    let app = fallback_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/retrain")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

    let json = get_body_json(response).await;
    assert!(json.get("error").is_some());
}
