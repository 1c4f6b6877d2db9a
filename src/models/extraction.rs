//! Place/technology extraction result

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Location used when the model gives us nothing usable
pub const DEFAULT_LOCATION: &str = "Australia";

/// Renewable technology a siting request is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Technology {
    Solar,
    #[default]
    Wind,
    Hydro,
}

impl Technology {
    pub const ALL: [Technology; 3] = [Technology::Solar, Technology::Wind, Technology::Hydro];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Technology::Solar => "solar",
            Technology::Wind => "wind",
            Technology::Hydro => "hydro",
        }
    }

    /// Case-insensitive parse; unknown names yield `None`
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|tech| tech.as_str().eq_ignore_ascii_case(value.trim()))
    }
}

impl fmt::Display for Technology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured fields the language model extracts from free text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResult {
    pub location_query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub technology: Option<Technology>,
}

impl Default for ExtractResult {
    fn default() -> Self {
        Self {
            location_query: DEFAULT_LOCATION.to_string(),
            technology: None,
        }
    }
}

impl ExtractResult {
    /// Build from the raw completion text.
    ///
    /// Invalid JSON, a non-object, or a missing/empty `locationQuery` all fall
    /// back to [`DEFAULT_LOCATION`]. Unknown technology names are dropped.
    #[must_use]
    pub fn from_completion(content: Option<&str>) -> Self {
        let Some(value) = content.and_then(|text| serde_json::from_str::<Value>(text).ok()) else {
            return Self::default();
        };

        let location_query = value
            .get("locationQuery")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .unwrap_or(DEFAULT_LOCATION)
            .to_string();

        let technology = value
            .get("technology")
            .and_then(Value::as_str)
            .and_then(Technology::parse);

        Self {
            location_query,
            technology,
        }
    }

    /// Bias the query toward Australian results.
    ///
    /// Appends ", Australia" unless the query already mentions it (any case).
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.location_query = normalize_location_query(&self.location_query);
        self
    }

    /// Technology to report, defaulting to wind
    #[must_use]
    pub fn technology_or_default(&self) -> Technology {
        self.technology.unwrap_or_default()
    }
}

/// Append ", Australia" when the query does not already mention it
#[must_use]
pub fn normalize_location_query(query: &str) -> String {
    if query.to_lowercase().contains("australia") {
        query.to_string()
    } else {
        format!("{query}, Australia")
    }
}
