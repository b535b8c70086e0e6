//! Run summary types.

use super::result::FetchOutcome;
use crate::writer::WriterReport;
use std::path::{Path, PathBuf};

/// Summary of a complete run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// File the commits were written to. Only exists if `commits_written > 0`.
    pub output_path: PathBuf,

    /// Number of repository pages requested successfully.
    pub pages_listed: usize,

    /// Number of repositories returned by the listing.
    pub repositories_listed: usize,

    /// Number of repositories a fetcher was launched for.
    pub repositories_dispatched: usize,

    /// Number of repositories whose commit listing failed.
    pub repositories_failed: usize,

    /// Number of commits handed to the writer.
    pub commits_pushed: usize,

    /// Number of commits skipped because their patch could not be retrieved.
    pub commits_dropped: usize,

    /// Number of commits persisted.
    pub commits_written: usize,

    /// Number of commits that failed to persist.
    pub commits_failed: usize,

    /// Number of commits discarded after the requested total was reached.
    pub commits_discarded: usize,
}

impl RunSummary {
    /// Creates a new empty summary for a run writing to `output_path`.
    #[must_use]
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            output_path,
            ..Default::default()
        }
    }

    /// Updates the summary with one fetcher's result.
    pub fn record_fetch(&mut self, outcome: &FetchOutcome) {
        match outcome {
            FetchOutcome::Completed {
                pushed, dropped, ..
            }
            | FetchOutcome::Interrupted {
                pushed, dropped, ..
            } => {
                self.commits_pushed += pushed;
                self.commits_dropped += dropped;
            }
            FetchOutcome::Failed { .. } => self.repositories_failed += 1,
        }
    }

    /// Updates the summary with the writer's totals.
    pub fn record_writer(&mut self, report: &WriterReport) {
        self.commits_written += report.written;
        self.commits_failed += report.failed;
        self.commits_discarded += report.discarded;
    }

    /// Returns the output file path, if anything was written to it.
    #[must_use]
    pub fn output(&self) -> Option<&Path> {
        (self.commits_written > 0).then_some(self.output_path.as_path())
    }

    /// Returns true if any repository or record failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.repositories_failed > 0 || self.commits_failed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn can_record_results() {
        let mut summary = RunSummary::new(PathBuf::from("commits.json"));

        summary.record_fetch(&FetchOutcome::Completed {
            repository: "acme/widgets".to_string(),
            pushed: 3,
            dropped: 1,
        });
        summary.record_fetch(&FetchOutcome::Interrupted {
            repository: "acme/gadgets".to_string(),
            pushed: 2,
            dropped: 0,
        });
        summary.record_fetch(&FetchOutcome::Failed {
            repository: "acme/broken".to_string(),
            error: "status 500".to_string(),
        });
        summary.record_writer(&WriterReport {
            written: 4,
            failed: 0,
            discarded: 1,
        });

        assert_eq!(summary.commits_pushed, 5);
        assert_eq!(summary.commits_dropped, 1);
        assert_eq!(summary.repositories_failed, 1);
        assert_eq!(summary.commits_written, 4);
        assert_eq!(summary.commits_discarded, 1);
        assert!(summary.has_failures());
        assert_eq!(summary.output(), Some(Path::new("commits.json")));
    }

    #[test]
    fn empty_run_has_no_output() {
        let summary = RunSummary::new(PathBuf::from("commits.json"));

        assert_eq!(summary.output(), None);
        assert!(!summary.has_failures());
    }
}
