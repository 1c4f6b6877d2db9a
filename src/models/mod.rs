//! Data models for the Griddy service
//!
//! This module contains the core domain models organized by concern:
//! - Extraction: structured place/technology pairs produced by the language model
//! - Geocode: coordinates and the combined agent result
//! - Marker: map marker data mirrored onto the map provider
//! - Message: chat log entries
//! - Ml: mock and external scoring service payloads

pub mod extraction;
pub mod geocode;
pub mod marker;
pub mod message;
pub mod ml;

// Re-export all public types for convenient access
pub use extraction::{ExtractResult, Technology};
pub use geocode::{AgentResponse, Coordinate, GeocodeHit, GeocodeResult};
pub use marker::MarkerData;
pub use message::{Message, Role};
pub use ml::{DatesResponse, DatesSummary, MockSite, ScoreRequest, ScoreResponse, TopPoint};
