//! HTTP routes mounted under `/api`

mod agent;
mod error;
mod ml;
mod state;

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde_json::{Value, json};

use crate::map::{AUSTRALIA_CENTER, DEFAULT_ZOOM};

pub use error::ApiError;
pub use state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/agent", post(agent::run_agent))
        .route("/echo-ml", post(ml::echo))
        .route("/ml/dates", get(ml::dates))
        .route("/ml/score", post(ml::score))
        .route("/health", get(health))
        .route("/map-config", get(map_config))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": crate::VERSION }))
}

/// Browser-side map settings; only the public key is ever exposed
async fn map_config(State(state): State<AppState>) -> Json<Value> {
    let mut config = json!({
        "center": AUSTRALIA_CENTER,
        "zoom": DEFAULT_ZOOM,
    });
    if let Some(key) = state.config.geocoding.public_api_key.as_deref() {
        config["apiKey"] = json!(key);
    }
    Json(config)
}
