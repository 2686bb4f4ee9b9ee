//! Layered error definitions
//!
//! Categorized by source: config / recording / io

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Recording Errors =====
    /// Recording parse error
    #[error("recording parse error: {message}")]
    RecordingParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Recording validation error
    #[error("recording validation error at '{field}': {message}")]
    RecordingValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create recording parse error
    pub fn recording_parse(message: impl Into<String>) -> Self {
        Self::RecordingParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create recording validation error
    pub fn recording_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RecordingValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
