// Sinusoid Runner - Command-line host for the sinusoid plugin
// Copyright (c) 2025 David Martin Venti
//
// Dual-licensed under AGPL-3.0 and Commercial License.
// See LICENSE file for details.

//! Error types for the runner

use sinusoid::{ConfigError, SinusoidError};
use thiserror::Error;

/// Anything that stops the runner
#[derive(Error, Debug)]
pub enum RunnerError {
    /// Reading the config file or writing output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration could not be built
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The plugin stopped producing data or was misused
    #[error("Plugin error: {0}")]
    Plugin(#[from] SinusoidError),

    /// Metadata could not be rendered
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for runner operations
pub type Result<T> = std::result::Result<T, RunnerError>;
