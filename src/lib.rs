//! Griddy - map-based chat assistant for renewable-energy siting
//!
//! This library turns free-text siting questions into geocoded map markers,
//! proxies the external ML scoring service, and models the chat and map
//! views that sit on top of those routes.

pub mod agent;
pub mod api;
pub mod chat;
pub mod client;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod llm;
pub mod map;
pub mod ml;
pub mod models;
pub mod telemetry;
pub mod web;

// Re-export core types for public API
pub use agent::AgentService;
pub use api::AppState;
pub use chat::{ChatSession, Resolution, Ticket};
pub use client::{AgentClient, AgentReply, HttpAgentClient, MlClient};
pub use config::GriddyConfig;
pub use error::GriddyError;
pub use geocoding::{Geocoder, GoogleGeocoder};
pub use llm::{LlmProvider, OpenAiProvider};
pub use map::{ConsoleMap, MapProvider, MapView};
pub use ml::MlProxy;
pub use models::{
    AgentResponse, Coordinate, ExtractResult, GeocodeResult, MarkerData, Message, Role, Technology,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, GriddyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
