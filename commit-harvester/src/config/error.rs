//! Configuration error types.

use thiserror::Error;

/// Errors that can occur while resolving the run configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The requested total is not a positive number.
    #[error("Total must be greater than 0, got {value}")]
    InvalidTotal { value: i64 },

    /// The cursor date is not an ISO-8601 date or timestamp.
    #[error("Invalid date '{value}': expected an ISO-8601 date or timestamp")]
    InvalidDate { value: String },

    /// Failed to read a file.
    #[error("Failed to read file '{path}': {source}")]
    IoError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML content.
    #[error("Failed to parse config file '{path}': {source}")]
    TomlError {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    /// A setting is out of range.
    #[error("Invalid setting '{field}': {message}")]
    ValidationError { field: String, message: String },
}
