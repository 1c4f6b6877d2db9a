//! Google Geocoding API client
//!
//! Resolves a free-form address into the best matching coordinate. A query
//! with no match is not an error: the caller decides how to report it.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use crate::config::GeocodingConfig;
use crate::models::{Coordinate, GeocodeHit};
use crate::{GriddyError, Result};

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Geocode an address; `Ok(None)` when nothing matched
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeHit>>;
}

/// Geocoder backed by `maps/api/geocode/json`
pub struct GoogleGeocoder {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GoogleGeocoder {
    pub fn new(config: &GeocodingConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: &GeocodingConfig) -> Self {
        Self {
            client,
            api_key: config.server_key().map(str::to_string),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request_url(&self, address: &str, key: &str) -> String {
        format!(
            "{}/geocode/json?address={}&key={}",
            self.base_url,
            urlencoding::encode(address),
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Option<GeocodeHit>> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| GriddyError::missing_key("Google Maps API key"))?;

        info!("Geocoding location: '{}'", address);
        let start_time = Instant::now();

        // reqwest errors carry the URL, and with it the key: strip it
        let response = self
            .client
            .get(self.request_url(address, key))
            .send()
            .await
            .map_err(|e| GriddyError::upstream("geocoder", e.without_url().to_string()))?;
        let geocoding: google::GeocodingResponse = response.json().await.map_err(|e| {
            GriddyError::upstream(
                "geocoder",
                format!("Invalid geocoding response: {}", e.without_url()),
            )
        })?;

        let total_duration = start_time.elapsed();

        // a result without a location is a miss, same as no result at all
        let best = geocoding.results.unwrap_or_default().into_iter().next();
        let location = best.as_ref().and_then(google::GeocodingResult::location);
        let (Some(best), Some(location)) = (best, location) else {
            warn!(
                "No results found for location '{}' (status {})",
                address,
                geocoding.status.as_deref().unwrap_or("unknown")
            );
            return Ok(None);
        };

        debug!(
            "Geocoded '{}' to ({:.4}, {:.4}) in {:.3}s",
            address,
            location.lat,
            location.lng,
            total_duration.as_secs_f64()
        );

        Ok(Some(GeocodeHit {
            coordinate: Coordinate::new(location.lat, location.lng),
            formatted_address: best.formatted_address,
            place_id: best.place_id,
        }))
    }
}

/// Google Geocoding API response structures
mod google {
    use super::Deserialize;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
        pub status: Option<String>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub geometry: Option<Geometry>,
        pub formatted_address: Option<String>,
        pub place_id: Option<String>,
    }

    impl GeocodingResult {
        pub fn location(&self) -> Option<LatLng> {
            self.geometry.as_ref()?.location
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct Geometry {
        pub location: Option<LatLng>,
    }

    #[derive(Debug, Clone, Copy, Deserialize)]
    pub struct LatLng {
        pub lat: f64,
        pub lng: f64,
    }
}
