//! HTTP clients for Griddy's own routes
//!
//! [`HttpAgentClient`] feeds the chat session; [`MlClient`] gives typed access
//! to the scoring proxy.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::{debug, instrument, warn};

use crate::models::{AgentResponse, DatesResponse, ScoreRequest, ScoreResponse};
use crate::{GriddyError, Result};

/// How a call to `/api/agent` ended, from the chat's point of view
#[derive(Debug, Clone, PartialEq)]
pub enum AgentReply {
    /// 2xx with a decoded body
    Ok(AgentResponse),
    /// Non-2xx status
    Rejected(u16),
    /// Transport failure or undecodable body
    NetworkError(String),
}

#[async_trait]
pub trait AgentClient: Send + Sync {
    async fn ask(&self, prompt: &str) -> AgentReply;
}

pub struct HttpAgentClient {
    client: Client,
    base_url: String,
}

impl HttpAgentClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl AgentClient for HttpAgentClient {
    #[instrument(skip(self, prompt))]
    async fn ask(&self, prompt: &str) -> AgentReply {
        let response = match self
            .client
            .post(format!("{}/api/agent", self.base_url))
            .json(&json!({ "prompt": prompt }))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!("Agent request failed: {}", e);
                return AgentReply::NetworkError(e.to_string());
            }
        };

        let status = response.status();
        match response.json::<AgentResponse>().await {
            Ok(body) if status.is_success() => AgentReply::Ok(body),
            Ok(body) => {
                debug!("Agent rejected request: {} {:?}", status, body.error);
                AgentReply::Rejected(status.as_u16())
            }
            Err(e) => {
                warn!("Undecodable agent response ({}): {}", status, e);
                AgentReply::NetworkError(e.to_string())
            }
        }
    }
}

/// Typed client for `/api/ml/*`
pub struct MlClient {
    client: Client,
    base_url: String,
}

impl MlClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Score a grid around a point
    pub async fn score_grid(&self, request: &ScoreRequest) -> Result<ScoreResponse> {
        let response = self
            .client
            .post(format!("{}/api/ml/score", self.base_url))
            .json(request)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Dates the scoring service has data for
    pub async fn list_dates(&self) -> Result<DatesResponse> {
        let response = self
            .client
            .get(format!("{}/api/ml/dates", self.base_url))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(GriddyError::upstream(
                "ML service",
                format!("HTTP {status}: {text}"),
            ));
        }
        Ok(response.json().await?)
    }
}
