//! Geocoding models and the combined agent result

use serde::{Deserialize, Serialize};

use super::Technology;

/// Source tag reported for coordinates from the Google geocoder
pub const GEOCODING_SOURCE: &str = "google-geocoding";

/// Error marker set on a result when the geocoder finds nothing
pub const GEOCODING_FAILED: &str = "Geocoding failed";

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Format as "(lat, lng)" with four decimals
    #[must_use]
    pub fn format_coordinates(&self) -> String {
        format!("({:.4}, {:.4})", self.lat, self.lng)
    }
}

/// Best match returned by a geocoder
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeHit {
    pub coordinate: Coordinate,
    pub formatted_address: Option<String>,
    pub place_id: Option<String>,
}

/// Result of the extraction-and-geocode pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeocodeResult {
    #[serde(default)]
    pub technology: Technology,
    pub location_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coordinate: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GeocodeResult {
    /// Result for a successful geocode
    #[must_use]
    pub fn found(technology: Technology, location_query: String, hit: GeocodeHit) -> Self {
        Self {
            technology,
            location_query,
            coordinate: Some(hit.coordinate),
            full_address: hit.formatted_address,
            place_id: hit.place_id,
            source: Some(GEOCODING_SOURCE.to_string()),
            error: None,
        }
    }

    /// Soft failure: the request succeeded but nothing matched
    #[must_use]
    pub fn not_found(technology: Technology, location_query: String) -> Self {
        Self {
            technology,
            location_query,
            coordinate: None,
            full_address: None,
            place_id: None,
            source: None,
            error: Some(GEOCODING_FAILED.to_string()),
        }
    }
}

/// Body of a `/api/agent` response as seen by clients
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<GeocodeResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
