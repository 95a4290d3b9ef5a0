//! Core error types for cadence-core.
//!
//! The engine itself is pure computation over pre-fetched data, so the
//! taxonomy is narrow: lookups that miss, recurrence labels that do not
//! parse, and contract violations reported by stores. Config and snapshot
//! I/O bring their own variants.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for cadence-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A referenced record does not exist in the supplied data
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Unrecognized recurrence unit or pattern
    #[error("Invalid recurrence: '{value}'")]
    InvalidRecurrence { value: String },

    /// A second active period was about to be created for a task
    #[error("Task {task_id} already has an active period")]
    ActivePeriodConflict { task_id: String },

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn task_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "task",
            id: id.into(),
        }
    }

    pub fn period_not_found(id: impl Into<String>) -> Self {
        CoreError::NotFound {
            entity: "period",
            id: id.into(),
        }
    }

    pub fn invalid_recurrence(value: impl Into<String>) -> Self {
        CoreError::InvalidRecurrence {
            value: value.into(),
        }
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let err = CoreError::task_not_found("t-1");
        assert_eq!(err.to_string(), "task not found: t-1");
    }

    #[test]
    fn validation_error_converts_into_core_error() {
        let err: CoreError = ValidationError::InvalidValue {
            field: "frequency".into(),
            message: "must be at least 1".into(),
        }
        .into();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(err.to_string().contains("frequency"));
    }
}
