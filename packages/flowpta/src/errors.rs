//! Error types for flowpta
//!
//! Only the edges of a run can fail (loading programs and configs, locating
//! the entry method, writing results). The analysis phases themselves degrade
//! to conservative behavior instead of returning errors.

use crate::config::ConfigError;
use thiserror::Error;

/// Main error type for flowpta operations
#[derive(Debug, Error)]
pub enum PtaError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Entry method could not be located
    #[error("Entry method not found: {0}")]
    EntryNotFound(String),

    /// Result sink failure
    #[error("Result sink error: {0}")]
    Sink(String),
}

impl PtaError {
    pub fn sink(msg: impl Into<String>) -> Self {
        PtaError::Sink(msg.into())
    }
}

/// Result type alias for flowpta operations
pub type Result<T> = std::result::Result<T, PtaError>;
