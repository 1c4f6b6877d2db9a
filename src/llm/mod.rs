//! Language model access
//!
//! The extraction pipeline only needs one capability: send a system prompt
//! and a user prompt, get back the JSON text the model produced.

pub mod openai;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::GriddyError;

pub use openai::OpenAiProvider;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Missing language model API key")]
    MissingApiKey,
    #[error("Network Error: {0}")]
    Network(String),
    #[error("API Error: {0}")]
    Api(String),
    #[error("Invalid Response: {0}")]
    InvalidResponse(String),
}

impl From<LlmError> for GriddyError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingApiKey => GriddyError::missing_key("language model API key"),
            other => GriddyError::upstream("language model", other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Ask for a JSON-object completion.
    ///
    /// Returns the first choice's content, or `None` when the model sent none.
    async fn complete_json(&self, messages: &[ChatMessage]) -> Result<Option<String>, LlmError>;
}
