//! Map marker model

use serde::{Deserialize, Serialize};

use super::{Coordinate, GeocodeResult};

/// A pin to draw on the map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerData {
    pub lat: f64,
    pub lng: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl MarkerData {
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self {
            lat,
            lng,
            title: None,
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Marker for a geocoded agent result, titled with the full address when known
    #[must_use]
    pub fn from_result(result: &GeocodeResult) -> Option<Self> {
        let coordinate = result.coordinate?;
        let title = result
            .full_address
            .clone()
            .unwrap_or_else(|| result.location_query.clone());
        Some(Self::new(coordinate.lat, coordinate.lng).with_title(title))
    }
}
