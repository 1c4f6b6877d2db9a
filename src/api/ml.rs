use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::ml::{ProxyResponse, mock};
use crate::models::Coordinate;

const PROXY_FAILED: &str = "Proxy failed";

/// `GET /api/ml/dates`
pub async fn dates(State(state): State<AppState>) -> Response {
    relay(state.ml.dates().await)
}

/// `POST /api/ml/score`
pub async fn score(State(state): State<AppState>, body: Bytes) -> Response {
    let Ok(payload) = serde_json::from_slice::<Value>(&body) else {
        tracing::warn!("Score request body is not JSON");
        return ApiError::internal(PROXY_FAILED).into_response();
    };
    relay(state.ml.score(&payload).await)
}

fn relay(result: crate::Result<ProxyResponse>) -> Response {
    match result {
        Ok(ProxyResponse { status, body }) => {
            let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
            (status, Json(body)).into_response()
        }
        Err(e) => {
            tracing::warn!("ML proxy failed: {}", e);
            ApiError::internal(PROXY_FAILED).into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct EchoRequest {
    coordinate: Option<Coordinate>,
}

/// `POST /api/echo-ml`: mock scorer for local testing
pub async fn echo(body: Bytes) -> Json<Value> {
    let request: EchoRequest = serde_json::from_slice(&body).unwrap_or_default();
    let sites = mock::generate_sites(request.coordinate);
    Json(json!({ "sites": sites }))
}
