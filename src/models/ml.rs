//! Payloads of the ML scoring service and the local mock scorer

use serde::{Deserialize, Serialize};

/// Candidate site produced by the mock scorer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MockSite {
    pub id: String,
    pub lat: f64,
    pub lng: f64,
    pub score: f64,
    pub summary: String,
}

/// Request for `/score`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub lat: f64,
    pub lon: f64,
    /// ISO date, one of the values listed by `/dates`
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_deg: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPoint {
    pub lat: f64,
    pub lon: f64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub top3: Vec<TopPoint>,
    pub heatmap: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatesSummary {
    pub count: u32,
    pub min_date: String,
    pub max_date: String,
}

/// Response of `/dates`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatesResponse {
    pub summary: DatesSummary,
    pub dates: Vec<String>,
}
