//! Error types for CLI operations.

use contracts::ObjectClass;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Recording file not found
    #[error("Recording not found: {path}")]
    RecordingNotFound { path: String },

    /// Identifiers changed between associated cycles
    #[error("ID maintenance failed for {class}: {failures} of {checks} checks changed identifier")]
    IdMaintenanceFailed {
        class: ObjectClass,
        failures: usize,
        checks: usize,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn recording_not_found(path: impl Into<String>) -> Self {
        Self::RecordingNotFound { path: path.into() }
    }

    pub fn id_maintenance_failed(class: ObjectClass, failures: usize, checks: usize) -> Self {
        Self::IdMaintenanceFailed {
            class,
            failures,
            checks,
        }
    }
}
