use std::sync::Arc;

use crate::agent::AgentService;
use crate::config::GriddyConfig;
use crate::geocoding::{Geocoder, GoogleGeocoder};
use crate::llm::{LlmProvider, OpenAiProvider};
use crate::ml::MlProxy;

/// Shared, immutable per-process state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GriddyConfig>,
    pub agent: AgentService,
    pub ml: MlProxy,
}

impl AppState {
    pub fn new(
        config: GriddyConfig,
        llm: Arc<dyn LlmProvider>,
        geocoder: Arc<dyn Geocoder>,
    ) -> Self {
        let ml = MlProxy::new(&config.ml);
        Self {
            agent: AgentService::new(llm, geocoder),
            ml,
            config: Arc::new(config),
        }
    }

    /// Build the real upstream clients from configuration
    pub fn from_config(config: GriddyConfig) -> Self {
        let client = reqwest::Client::new();
        let llm: Arc<dyn LlmProvider> =
            Arc::new(OpenAiProvider::with_client(client.clone(), &config.llm));
        let geocoder: Arc<dyn Geocoder> =
            Arc::new(GoogleGeocoder::with_client(client, &config.geocoding));
        Self::new(config, llm, geocoder)
    }
}
