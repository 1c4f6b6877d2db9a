//! Extraction-and-geocode pipeline
//!
//! Turns a free-text siting request into a geocoded result: the language
//! model extracts a place and a technology, the place is biased toward
//! Australia, then geocoded. The two calls run strictly one after the other.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::geocoding::Geocoder;
use crate::llm::{ChatMessage, LlmProvider};
use crate::models::{ExtractResult, GeocodeResult};
use crate::{GriddyError, Result};

pub const EXTRACTION_PROMPT: &str = "Extract the target place and technology from the user text. \
Respond ONLY as JSON with keys: locationQuery (string, include state and country if known; \
prefer Australian locality), technology (one of solar, wind, hydro).";

#[derive(Clone)]
pub struct AgentService {
    llm: Arc<dyn LlmProvider>,
    geocoder: Arc<dyn Geocoder>,
}

impl AgentService {
    pub fn new(llm: Arc<dyn LlmProvider>, geocoder: Arc<dyn Geocoder>) -> Self {
        Self { llm, geocoder }
    }

    /// Ask the model for `{locationQuery, technology}`, falling back to Australia
    #[instrument(skip(self, prompt), fields(provider = self.llm.name()))]
    pub async fn extract(&self, prompt: &str) -> Result<ExtractResult> {
        let messages = [ChatMessage::system(EXTRACTION_PROMPT), ChatMessage::user(prompt)];
        let content = self.llm.complete_json(&messages).await?;

        let extracted = ExtractResult::from_completion(content.as_deref());
        debug!(
            "Extracted location '{}' ({:?})",
            extracted.location_query, extracted.technology
        );
        Ok(extracted)
    }

    /// Run the whole pipeline for one prompt.
    ///
    /// A geocoding miss is a successful result carrying an error marker.
    #[instrument(skip(self, prompt))]
    pub async fn run(&self, prompt: &str) -> Result<GeocodeResult> {
        if prompt.is_empty() {
            return Err(GriddyError::validation("Missing prompt"));
        }

        let extracted = self.extract(prompt).await?.normalized();
        let technology = extracted.technology_or_default();

        let result = match self.geocoder.geocode(&extracted.location_query).await? {
            Some(hit) => GeocodeResult::found(technology, extracted.location_query, hit),
            None => GeocodeResult::not_found(technology, extracted.location_query),
        };

        info!(
            "Agent resolved '{}' for {} (found: {})",
            result.location_query,
            result.technology,
            result.coordinate.is_some()
        );
        Ok(result)
    }
}
