//! Per-repository fetch results.

/// Result of fetching a single repository's commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Every commit on the page was either pushed or dropped by enrichment.
    Completed {
        /// Repository full name.
        repository: String,
        /// Commits handed to the writer.
        pushed: usize,
        /// Commits skipped because their patch could not be retrieved.
        dropped: usize,
    },

    /// The result channel closed before the page was exhausted.
    Interrupted {
        /// Repository full name.
        repository: String,
        /// Commits handed to the writer.
        pushed: usize,
        /// Commits skipped because their patch could not be retrieved.
        dropped: usize,
    },

    /// The commit listing itself failed.
    Failed {
        /// Repository full name.
        repository: String,
        /// Error message.
        error: String,
    },
}
