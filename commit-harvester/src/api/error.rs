//! Remote source error types.

use thiserror::Error;

/// Errors that can occur while talking to the hosting API.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not be sent or its body could not be read.
    #[error("Request to '{url}' failed: {source}")]
    Unavailable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The API answered with a non-success status.
    #[error("Request to '{url}' returned status {status}")]
    Status { url: String, status: u16 },

    /// The response body did not match the expected schema.
    #[error("Failed to decode response from '{url}': {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// A URL handed to the client could not be parsed.
    #[error("Invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl SourceError {
    /// Returns the HTTP status if the API answered with one.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
