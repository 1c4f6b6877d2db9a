use axum::{Json, body::Bytes, extract::State};
use serde_json::{Value, json};

use super::{ApiError, AppState};

/// `POST /api/agent`: `{prompt}` in, `{result}` out
pub async fn run_agent(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let prompt = extract_prompt(&body).ok_or_else(|| ApiError::bad_request("Missing prompt"))?;

    match state.agent.run(&prompt).await {
        Ok(result) => Ok(Json(json!({ "result": result }))),
        Err(e) => {
            tracing::error!("Agent error: {}", e);
            Err(ApiError::from_error(&e, "Agent failed"))
        }
    }
}

/// Non-empty string `prompt` of a JSON object body
fn extract_prompt(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("prompt")
        .and_then(Value::as_str)
        .filter(|prompt| !prompt.is_empty())
        .map(str::to_string)
}
