//! Writer error types.

use thiserror::Error;

/// Errors that can occur while persisting a commit.
#[derive(Debug, Error)]
pub enum WriterError {
    /// Failed to open or append to the output file.
    #[error("Failed to write '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Failed to encode the commit as JSON.
    #[error("Failed to encode commit: {0}")]
    Encode(#[from] serde_json::Error),
}
