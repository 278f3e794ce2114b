//! Server command implementation

use std::path::Path;

use anyhow::Result;

use spur_core::RewardEngine;
use spur_server::ServerConfig;

pub async fn cmd_serve(
    model_path: Option<&Path>,
    host: &str,
    port: u16,
    cors_origins: Vec<String>,
) -> Result<()> {
    println!("🚀 Starting Spur scoring server...");
    println!("   Listening: http://{}:{}", host, port);
    if !cors_origins.is_empty() {
        println!("   CORS origins: {}", cors_origins.join(", "));
    }

    let engine = RewardEngine::bootstrap(model_path)?;
    if engine.model_loaded() {
        println!("   Predictor: model artifact loaded");
    } else {
        println!("   Predictor: unavailable, fallback rules only");
    }

    let config = ServerConfig {
        allowed_origins: cors_origins,
    };

    spur_server::serve(engine, host, port, config).await
}
