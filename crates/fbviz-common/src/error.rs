//! Error types and utilities for fbviz.

use thiserror::Error;

/// Result type alias for fbviz operations.
pub type Result<T> = std::result::Result<T, FbvizError>;

type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for fbviz operations.
#[derive(Error, Debug)]
pub enum FbvizError {
    /// Configuration related errors.
    #[error("Configuration error: {message}")]
    Config {
        /// What went wrong.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// I/O related errors.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network related errors (HTTP requests, image downloads).
    #[error("Network error: {message}")]
    Network {
        /// What went wrong.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// The statistics provider answered with something unusable.
    #[error("Data source error: {message}")]
    DataSource {
        /// What went wrong.
        message: String,
        /// HTTP status of the response, if there was one.
        status_code: Option<u16>,
    },

    /// Cache read/write failures.
    #[error("Cache error: {message}")]
    Cache {
        /// What went wrong.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Serialization/deserialization errors.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Chart rendering and image compositing errors.
    #[error("Render error: {message}")]
    Render {
        /// What went wrong.
        message: String,
        /// Underlying error, if any.
        #[source]
        source: Option<BoxedSource>,
    },

    /// Validation errors for input data.
    #[error("Validation error: {message}")]
    Validation {
        /// What went wrong.
        message: String,
        /// Offending input field, if known.
        field: Option<String>,
    },
}

impl FbvizError {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new network error with source.
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new data source error.
    pub fn data_source(msg: impl Into<String>) -> Self {
        Self::DataSource {
            message: msg.into(),
            status_code: None,
        }
    }

    /// Create a new data source error carrying the HTTP status.
    pub fn data_source_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::DataSource {
            message: msg.into(),
            status_code: Some(status),
        }
    }

    /// Create a new cache error.
    pub fn cache(msg: impl Into<String>) -> Self {
        Self::Cache {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new cache error with source.
    pub fn cache_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Cache {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new render error.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new render error with source.
    pub fn render_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Render {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new validation error.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: None,
        }
    }

    /// Create a new validation error with field name.
    pub fn validation_field(msg: impl Into<String>, field: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
            field: Some(field.into()),
        }
    }
}

/// Convert from `reqwest::Error` to `FbvizError`.
impl From<reqwest::Error> for FbvizError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::network_with_source("Connection failed", err)
        } else if err.is_status() {
            let status_code = err.status().map_or(0, |s| s.as_u16());
            Self::network_with_source(format!("HTTP error: {status_code}"), err)
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

#[cfg(feature = "plotters")]
/// Convert from plotters drawing errors to `FbvizError`.
impl<T> From<plotters::drawing::DrawingAreaErrorKind<T>> for FbvizError
where
    T: std::error::Error + Send + Sync + 'static,
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<T>) -> Self {
        Self::render_with_source("Chart drawing failed", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let config_error = FbvizError::config("missing base url");
        assert!(config_error.to_string().contains("Configuration error"));
        assert!(config_error.to_string().contains("missing base url"));

        let source_error = FbvizError::data_source_with_status("bad gateway", 502);
        assert!(source_error.to_string().contains("Data source error"));
        assert!(matches!(
            source_error,
            FbvizError::DataSource {
                status_code: Some(502),
                ..
            }
        ));

        let validation_error = FbvizError::validation_field("negative xG", "home_xg");
        assert!(validation_error.to_string().contains("Validation error"));
        assert!(validation_error.to_string().contains("negative xG"));
    }

    #[test]
    fn test_error_with_source() {
        let wrapped = FbvizError::cache_with_source(
            "Failed to write cache entry",
            io::Error::new(io::ErrorKind::PermissionDenied, "Access denied"),
        );

        assert!(wrapped.to_string().contains("Cache error"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: FbvizError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let serde_error = serde_json::from_str::<serde_json::Value>(r#"{"invalid": json}"#)
            .unwrap_err();
        let error: FbvizError = serde_error.into();

        assert!(error.to_string().contains("Serialization error"));
    }
}
