// src/error.rs

//! Unified error handling for the novel tracker.

use std::fmt;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Normalizer input was not a set of key/value pairs
    #[error("Invalid input shape: {0}")]
    InvalidInputShape(String),

    /// Normalizer was given zero records
    #[error("Empty batch: at least one record is required")]
    EmptyBatch,

    /// Edit key matches no known sub-structure or field
    #[error("Cannot resolve origin of edit key '{0}'")]
    UnresolvableOrigin(String),

    /// Reconciler found nothing to submit. Not a fault.
    #[error("No changes to submit")]
    NoChanges,

    /// Proposed edit value does not fit the field's type
    #[error("Invalid value for '{field}': {message}")]
    InvalidFieldValue { field: String, message: String },

    /// Novel Store API answered with a non-success status
    #[error("Store API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an input shape error.
    pub fn input_shape(message: impl Into<String>) -> Self {
        Self::InvalidInputShape(message.into())
    }

    /// Create an unresolvable origin error for an edit key.
    pub fn unresolvable(key: impl Into<String>) -> Self {
        Self::UnresolvableOrigin(key.into())
    }

    /// Create a field value error.
    pub fn field_value(field: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::InvalidFieldValue {
            field: field.into(),
            message: message.to_string(),
        }
    }

    /// Create a store API error.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this is the "nothing to submit" signal rather than a fault.
    pub fn is_no_changes(&self) -> bool {
        matches!(self, Self::NoChanges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_changes_is_not_a_fault() {
        assert!(AppError::NoChanges.is_no_changes());
        assert!(!AppError::EmptyBatch.is_no_changes());
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            AppError::unresolvable("novelStats_x").to_string(),
            "Cannot resolve origin of edit key 'novelStats_x'"
        );
        assert_eq!(
            AppError::field_value("rating", "must be between 0 and 10").to_string(),
            "Invalid value for 'rating': must be between 0 and 10"
        );
        assert_eq!(
            AppError::api(404, "Novel not found").to_string(),
            "Store API error (404): Novel not found"
        );
    }
}
