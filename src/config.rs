//! Configuration management for the Griddy service
//!
//! Handles loading configuration from files and environment variables,
//! honours the legacy environment names of the web frontend, and validates
//! every setting before the server starts.

use crate::GriddyError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

/// Root configuration structure for the Griddy service
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GriddyConfig {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Language model settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Geocoding and map provider settings
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    /// External ML scoring service settings
    #[serde(default)]
    pub ml: MlServiceConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Directory with the built frontend, served for non-API paths
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
    /// Maximum accepted request body in KB
    #[serde(default = "default_body_limit")]
    pub body_limit_kb: u32,
    /// PEM certificate for TLS (requires `tls_key_path` too)
    pub tls_cert_path: Option<String>,
    /// PEM private key for TLS
    pub tls_key_path: Option<String>,
}

/// Language model configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// API key for the chat-completions endpoint (`OPENAI_API_KEY`)
    pub api_key: Option<String>,
    /// Base URL for the chat-completions API
    #[serde(default = "default_llm_base_url")]
    pub base_url: String,
    /// Model used for extraction
    #[serde(default = "default_llm_model")]
    pub model: String,
}

/// Geocoding and map provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingConfig {
    /// Server-side key (`GOOGLE_MAPS_API_KEY`)
    pub api_key: Option<String>,
    /// Key exposed to the browser map (`NEXT_PUBLIC_GOOGLE_MAPS_API_KEY`)
    pub public_api_key: Option<String>,
    /// Base URL for the geocoding API
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
}

/// External ML scoring service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MlServiceConfig {
    /// Base URL of the scoring service (`ML_SERVICE_URL`)
    #[serde(default = "default_ml_base_url")]
    pub base_url: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
    /// OTLP/HTTP collector endpoint; spans are exported when set
    pub otlp_endpoint: Option<String>,
}

// Default value functions
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_body_limit() -> u32 {
    256
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_llm_model() -> String {
    "gpt-4o".to_string()
}

fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com/maps/api".to_string()
}

fn default_ml_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_server_host(),
            port: default_server_port(),
            static_dir: default_static_dir(),
            body_limit_kb: default_body_limit(),
            tls_cert_path: None,
            tls_key_path: None,
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_llm_base_url(),
            model: default_llm_model(),
        }
    }
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            public_api_key: None,
            base_url: default_geocoding_base_url(),
        }
    }
}

impl Default for MlServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_ml_base_url(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            otlp_endpoint: None,
        }
    }
}

impl GeocodingConfig {
    /// Key used for server-side geocoding; falls back to the public key
    #[must_use]
    pub fn server_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .or(self.public_api_key.as_deref())
            .filter(|key| !key.is_empty())
    }
}

impl GriddyConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path()
                .filter(|path| path.exists())
                .unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // GRIDDY__LLM__API_KEY, GRIDDY__SERVER__PORT, ...
        builder = builder.add_source(
            Environment::with_prefix("GRIDDY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: GriddyConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env(|name| env::var(name).ok());
        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("griddy").join("config.toml"))
    }

    /// Fill unset values from the environment names used by the web frontend
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|value| !value.is_empty());

        if self.llm.api_key.is_none() {
            self.llm.api_key = lookup("OPENAI_API_KEY");
        }
        if self.geocoding.api_key.is_none() {
            self.geocoding.api_key = lookup("GOOGLE_MAPS_API_KEY");
        }
        if self.geocoding.public_api_key.is_none() {
            self.geocoding.public_api_key = lookup("NEXT_PUBLIC_GOOGLE_MAPS_API_KEY");
        }
        if let Some(url) = lookup("ML_SERVICE_URL") {
            if self.ml.base_url == default_ml_base_url() {
                self.ml.base_url = url;
            }
        }
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.server.body_limit_kb == 0 {
            self.server.body_limit_kb = default_body_limit();
        }
        if self.llm.base_url.is_empty() {
            self.llm.base_url = default_llm_base_url();
        }
        if self.llm.model.is_empty() {
            self.llm.model = default_llm_model();
        }
        if self.geocoding.base_url.is_empty() {
            self.geocoding.base_url = default_geocoding_base_url();
        }
        if self.ml.base_url.is_empty() {
            self.ml.base_url = default_ml_base_url();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_server()?;
        self.validate_urls()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(GriddyError::config("Server port cannot be 0").into());
        }

        if self.server.tls_cert_path.is_some() != self.server.tls_key_path.is_some() {
            return Err(GriddyError::config(
                "TLS requires both server.tls_cert_path and server.tls_key_path",
            )
            .into());
        }

        Ok(())
    }

    fn validate_urls(&self) -> Result<()> {
        let urls = [
            ("Language model", &self.llm.base_url),
            ("Geocoding", &self.geocoding.base_url),
            ("ML service", &self.ml.base_url),
        ];

        for (name, url) in urls {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(GriddyError::config(format!(
                    "{name} base URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        if let Some(endpoint) = &self.logging.otlp_endpoint {
            if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
                return Err(GriddyError::config(
                    "OTLP endpoint must be a valid HTTP or HTTPS URL",
                )
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(GriddyError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(GriddyError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if self.llm.model.trim().is_empty() {
            return Err(GriddyError::config("Language model name cannot be empty").into());
        }

        Ok(())
    }
}
