//! Runner error types.

use crate::api::SourceError;

/// Errors that abort a run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Configuration errors.
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),

    /// HTTP client initialization errors.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    /// The first repository page could not be listed.
    #[error("Failed to list repositories: {0}")]
    Listing(#[from] SourceError),

    /// The writer task panicked.
    #[error("Writer task failed: {0}")]
    Writer(#[from] tokio::task::JoinError),
}
