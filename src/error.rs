//! Error types and handling for the Griddy service

use thiserror::Error;

/// Main error type for the Griddy service
#[derive(Error, Debug)]
pub enum GriddyError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A credential required for an upstream call is not configured
    #[error("Missing {name}")]
    MissingKey { name: String },

    /// Failures talking to the language model, geocoder or ML service
    #[error("{service} error: {message}")]
    Upstream { service: String, message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GriddyError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing-credential error, e.g. `missing_key("Google Maps API key")`
    pub fn missing_key<S: Into<String>>(name: S) -> Self {
        Self::MissingKey { name: name.into() }
    }

    /// Create a new upstream error for the named service
    pub fn upstream<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GriddyError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            GriddyError::MissingKey { name } => format!("Missing {name}"),
            GriddyError::Upstream { service, .. } => {
                format!("Unable to reach the {service}. Please try again later.")
            }
            GriddyError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            GriddyError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for GriddyError {
    /// The request URL is dropped: it can carry credentials in its query.
    fn from(err: reqwest::Error) -> Self {
        GriddyError::upstream("upstream service", err.without_url().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = GriddyError::config("bad base url");
        assert!(matches!(config_err, GriddyError::Config { .. }));

        let upstream_err = GriddyError::upstream("geocoder", "connection refused");
        assert!(matches!(upstream_err, GriddyError::Upstream { .. }));

        let validation_err = GriddyError::validation("Missing prompt");
        assert!(matches!(validation_err, GriddyError::Validation { .. }));
    }

    #[test]
    fn test_missing_key_display() {
        let err = GriddyError::missing_key("Google Maps API key");
        assert_eq!(err.to_string(), "Missing Google Maps API key");
        assert_eq!(err.user_message(), "Missing Google Maps API key");
    }

    #[test]
    fn test_user_messages() {
        let config_err = GriddyError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let upstream_err = GriddyError::upstream("language model", "boom");
        assert!(upstream_err.user_message().contains("language model"));
        assert!(!upstream_err.user_message().contains("boom"));

        let validation_err = GriddyError::validation("test input");
        assert!(validation_err.user_message().contains("test input"));
    }

    #[tokio::test]
    async fn test_reqwest_error_drops_url() {
        let err = reqwest::Client::new()
            .get("http://127.0.0.1:9/geocode/json?address=Dubbo&key=SECRET-MAPS-KEY")
            .send()
            .await
            .unwrap_err();
        let griddy_err: GriddyError = err.into();

        assert!(matches!(griddy_err, GriddyError::Upstream { .. }));
        assert!(!griddy_err.to_string().contains("SECRET-MAPS-KEY"));
        assert!(!griddy_err.user_message().contains("127.0.0.1"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let griddy_err: GriddyError = io_err.into();
        assert!(matches!(griddy_err, GriddyError::Io { .. }));
    }
}
