// Sinusoid - Synthetic sine-wave south plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for the sinusoid plugin
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Result type alias for plugin operations
pub type Result<T> = std::result::Result<T, SinusoidError>;

/// Main error type for plugin operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinusoidError {
    /// The plugin instance can no longer produce data.
    ///
    /// Surfaced to the host, which decides whether to restart or disable
    /// the source.
    #[error("Data retrieval failed for asset '{asset}': {reason}")]
    DataRetrieval { asset: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Lifecycle call made in the wrong state
    #[error("Invalid state: expected {expected}, found {actual}")]
    InvalidState {
        expected: &'static str,
        actual: &'static str,
    },

    /// Push mode started outside of a tokio runtime
    #[error("No async runtime available to spawn the emission task")]
    NoRuntime,
}

impl SinusoidError {
    /// Build a data retrieval error for `asset` from any displayable cause
    pub fn data_retrieval(asset: impl Into<String>, cause: impl std::fmt::Display) -> Self {
        SinusoidError::DataRetrieval {
            asset: asset.into(),
            reason: cause.to_string(),
        }
    }

    /// Whether this error means the source stopped producing data
    pub fn is_data_retrieval(&self) -> bool {
        matches!(self, SinusoidError::DataRetrieval { .. })
    }
}

/// Errors related to the configuration category
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Category JSON could not be parsed
    #[error("Malformed configuration category: {0}")]
    Parse(String),

    /// A required item is absent
    #[error("Missing configuration item: {0}")]
    MissingItem(String),

    /// Rate is not a positive number
    #[error("Invalid data rate '{0}': must be a positive number")]
    InvalidRate(String),
}

/// Errors reported by the ingestion sink
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SinkError {
    /// The sink no longer accepts readings
    #[error("Sink closed")]
    Closed,

    /// The sink refused a reading
    #[error("Reading rejected: {0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SinusoidError::data_retrieval("sinusoid", SinkError::Closed);
        let msg = format!("{}", err);
        assert!(msg.contains("sinusoid"));
        assert!(msg.contains("Sink closed"));
        assert!(err.is_data_retrieval());
    }

    #[test]
    fn test_error_conversion() {
        let config_err = ConfigError::InvalidRate("abc".to_string());
        let err: SinusoidError = config_err.into();
        assert!(matches!(err, SinusoidError::Config(_)));
        assert!(!err.is_data_retrieval());
    }

    #[test]
    fn test_invalid_state_display() {
        let err = SinusoidError::InvalidState {
            expected: "initialized",
            actual: "running",
        };
        assert_eq!(
            err.to_string(),
            "Invalid state: expected initialized, found running"
        );
    }
}
