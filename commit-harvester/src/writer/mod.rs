//! Newline-delimited JSON output.
//!
//! [`drain`] is the single consumer of the result channel. Every record goes
//! through [`CommitWriter::persist`], which holds the file lock across encoding
//! and appending, so a line is never interleaved with another one.

mod error;

pub use error::WriterError;

use crate::commits::Commit;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info};

/// Appends commits to an output file, one JSON object per line.
///
/// The file is opened on the first append, so a writer that never receives a
/// commit leaves nothing behind.
#[derive(Debug)]
pub struct CommitWriter {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl CommitWriter {
    /// Creates a writer appending to `path`.
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: Mutex::new(None),
        }
    }

    /// Returns the output file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Encodes `commit` and appends it as one line.
    ///
    /// # Errors
    ///
    /// Returns [`WriterError`] if the commit cannot be encoded or the file
    /// cannot be opened or appended to.
    pub async fn persist(&self, commit: &Commit) -> Result<(), WriterError> {
        let mut guard = self.file.lock().await;

        let mut line = serde_json::to_vec(commit)?;
        line.push(b'\n');

        let file = match guard.take() {
            Some(file) => file,
            None => self.open().await?,
        };
        let file = guard.insert(file);

        file.write_all(&line).await.map_err(|e| self.io_error(e))?;
        file.flush().await.map_err(|e| self.io_error(e))?;
        Ok(())
    }

    async fn open(&self) -> Result<File, WriterError> {
        debug!(path = %self.path.display(), "Opening output file");
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| self.io_error(e))
    }

    fn io_error(&self, source: std::io::Error) -> WriterError {
        WriterError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

/// Totals reported by [`drain`] once the channel is exhausted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterReport {
    /// Commits persisted.
    pub written: usize,
    /// Commits dropped because persisting them failed.
    pub failed: usize,
    /// Commits received after `limit` was reached.
    pub discarded: usize,
}

/// Persists commits from `receiver` until every sender is gone.
///
/// Once `limit` commits are written the receiver is closed, which makes
/// pending and future sends fail so fetchers stop early. Anything still
/// buffered is received and discarded, never written.
pub async fn drain(
    writer: Arc<CommitWriter>,
    mut receiver: mpsc::Receiver<Commit>,
    limit: usize,
) -> WriterReport {
    let mut report = WriterReport::default();

    while let Some(commit) = receiver.recv().await {
        if report.written >= limit {
            report.discarded += 1;
            continue;
        }

        match writer.persist(&commit).await {
            Ok(()) => {
                report.written += 1;
                if report.written >= limit {
                    info!(limit, "Reached requested total, closing result channel");
                    receiver.close();
                }
            }
            Err(e) => {
                error!(hash = %commit.hash, error = %e, "Failed to persist commit");
                report.failed += 1;
            }
        }
    }

    debug!(?report, "Writer finished");
    report
}
