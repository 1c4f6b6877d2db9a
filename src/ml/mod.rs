//! External ML scoring service
//!
//! The proxy forwards requests to the scoring service verbatim and hands back
//! its status and JSON body untouched. [`mock`] is the local stand-in used
//! when no scoring service is running.

pub mod mock;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::config::MlServiceConfig;
use crate::{GriddyError, Result};

/// Upstream status and body, relayed as-is
#[derive(Debug, Clone, PartialEq)]
pub struct ProxyResponse {
    pub status: u16,
    pub body: Value,
}

#[derive(Clone)]
pub struct MlProxy {
    client: Client,
    base_url: String,
}

impl MlProxy {
    pub fn new(config: &MlServiceConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &MlServiceConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// `GET {base}/dates`
    #[instrument(skip(self))]
    pub async fn dates(&self) -> Result<ProxyResponse> {
        let response = self
            .client
            .get(format!("{}/dates", self.base_url))
            .send()
            .await?;
        Self::relay(response).await
    }

    /// `POST {base}/score` with the caller's JSON body
    #[instrument(skip(self, body))]
    pub async fn score(&self, body: &Value) -> Result<ProxyResponse> {
        let response = self
            .client
            .post(format!("{}/score", self.base_url))
            .json(body)
            .send()
            .await?;
        Self::relay(response).await
    }

    async fn relay(response: reqwest::Response) -> Result<ProxyResponse> {
        let status = response.status().as_u16();
        let body: Value = response
            .json()
            .await
            .map_err(|e| GriddyError::upstream("ML service", format!("Non-JSON response: {e}")))?;

        debug!("ML service answered with HTTP {}", status);
        Ok(ProxyResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    fn proxy_for(server: &MockServer) -> MlProxy {
        MlProxy::new(&MlServiceConfig {
            base_url: server.uri(),
        })
    }

    #[tokio::test]
    async fn test_dates_relays_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dates"))
            .respond_with(ResponseTemplate::new(206).set_body_json(json!({"dates": ["2024-01-01"]})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = proxy_for(&mock_server).dates().await.unwrap();
        assert_eq!(response.status, 206);
        assert_eq!(response.body, json!({"dates": ["2024-01-01"]}));
    }

    #[tokio::test]
    async fn test_score_forwards_body() {
        let mock_server = MockServer::start().await;
        let request = json!({"lat": -32.2, "lon": 148.6, "date": "2024-01-01", "grid_size": 5});

        Mock::given(method("POST"))
            .and(path("/score"))
            .and(header("content-type", "application/json"))
            .and(body_json(request.clone()))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({"detail": "bad date"})))
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = proxy_for(&mock_server).score(&request).await.unwrap();
        assert_eq!(response.status, 422);
        assert_eq!(response.body["detail"], "bad date");
    }

    #[tokio::test]
    async fn test_non_json_upstream_is_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/dates"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>Bad Gateway</html>"))
            .mount(&mock_server)
            .await;

        let result = proxy_for(&mock_server).dates().await;
        assert!(matches!(result, Err(GriddyError::Upstream { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_error() {
        let proxy = MlProxy::new(&MlServiceConfig {
            base_url: "http://127.0.0.1:9".to_string(),
        });
        assert!(proxy.dates().await.is_err());
    }
}
