//! Orchestrates a harvesting run.
//!
//! A run moves through four stages:
//!
//! 1. **Listing**: request the first repository page. Failure here aborts the
//!    run before the output file exists.
//! 2. **Dispatching**: launch one fetcher per repository until the progress
//!    counter reaches the requested total. The counter grows by the page size
//!    per launched fetcher, so it is a soft cap on launched work.
//! 3. **Draining**: join every fetcher, then drop the last channel sender.
//! 4. **Done**: the writer consumes what is left and reports its totals.
//!
//! The writer separately stops persisting once the requested total is
//! written, so the output never holds more records than asked for.

mod config;
mod error;

pub use config::{
    RunnerConfig, DEFAULT_CHANNEL_CAPACITY, DEFAULT_CONCURRENCY, DEFAULT_PAGE_SIZE,
    DEFAULT_TIMEOUT_SECS, MAX_PAGE_SIZE,
};
pub use error::RunnerError;

use crate::api::{BitbucketClient, HostingApi};
use crate::commits::{fetch_commits, Commit};
use crate::repositories::{list_repositories, Cursor, RepositoryDescriptor, RepositoryPage};
use crate::summary::{FetchOutcome, RunSummary};
use crate::writer::{drain, CommitWriter};
use std::sync::Arc;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Orchestrates a full harvesting run.
pub struct Runner {
    config: RunnerConfig,
    api: Arc<dyn HostingApi>,
}

impl Runner {
    /// Builds a runner talking to the configured Bitbucket API.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError`] if the configuration is invalid or the HTTP
    /// client cannot be built.
    pub fn new(config: RunnerConfig) -> Result<Self, RunnerError> {
        config.validate()?;
        let client = BitbucketClient::new(config.parsed_api_url()?, config.timeout())?;
        Ok(Self {
            config,
            api: Arc::new(client),
        })
    }

    /// Builds a runner over any [`HostingApi`] implementation.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Config`] if the configuration is invalid.
    pub fn with_api(config: RunnerConfig, api: Arc<dyn HostingApi>) -> Result<Self, RunnerError> {
        config.validate()?;
        Ok(Self { config, api })
    }

    /// Returns the run configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Executes the full orchestration flow.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::Listing`] if the first repository page cannot be
    /// listed. Failures of individual repositories or records are logged and
    /// counted in the returned [`RunSummary`] instead.
    pub async fn run(&self) -> Result<RunSummary, RunnerError> {
        let config = &self.config;
        let total = config.total();
        let page_size = config.page_size();
        let output_path = config.output_path();
        let mut summary = RunSummary::new(output_path.clone());

        info!(
            total,
            page_size,
            after = %config.date(),
            output = %output_path.display(),
            "Starting harvest"
        );

        let cursor = Cursor::UpdatedAfter(config.date().to_string());
        let mut page =
            list_repositories(self.api.as_ref(), page_size, &cursor, config.web_url()).await?;
        summary.pages_listed = 1;

        let writer = Arc::new(CommitWriter::new(output_path));
        let (sender, receiver) = mpsc::channel::<Commit>(config.channel_capacity());
        let writer_task = tokio::spawn(drain(writer, receiver, total));

        let semaphore = Arc::new(Semaphore::new(config.concurrency()));
        let mut fetchers = JoinSet::new();
        let mut progress: usize = 0;

        loop {
            let RepositoryPage { repositories, next } = page;
            summary.repositories_listed += repositories.len();

            for repository in repositories {
                if progress >= total {
                    break;
                }
                progress += page_size as usize;
                summary.repositories_dispatched += 1;
                fetchers.spawn(self.fetch_task(repository, Arc::clone(&semaphore), sender.clone()));
            }

            if progress >= total || summary.pages_listed >= config.max_pages() {
                break;
            }
            let Some(next) = next else {
                break;
            };

            page = match list_repositories(self.api.as_ref(), page_size, &next, config.web_url())
                .await
            {
                Ok(page) => page,
                Err(e) => {
                    warn!(error = %e, "Failed to list further repositories, continuing with those dispatched");
                    break;
                }
            };
            summary.pages_listed += 1;
        }

        info!(
            dispatched = summary.repositories_dispatched,
            listed = summary.repositories_listed,
            "Dispatched commit fetchers"
        );

        while let Some(joined) = fetchers.join_next().await {
            match joined {
                Ok(outcome) => summary.record_fetch(&outcome),
                Err(e) => {
                    error!(error = %e, "Commit fetcher panicked");
                    summary.repositories_failed += 1;
                }
            }
        }

        // Closing the channel lets the writer finish once its buffer is empty.
        drop(sender);
        let report = writer_task.await?;
        summary.record_writer(&report);

        info!(
            written = summary.commits_written,
            dropped = summary.commits_dropped,
            failed = summary.commits_failed,
            discarded = summary.commits_discarded,
            "Harvest complete"
        );
        Ok(summary)
    }

    /// Builds the task fetching one repository once a concurrency slot frees up.
    fn fetch_task(
        &self,
        repository: RepositoryDescriptor,
        semaphore: Arc<Semaphore>,
        sender: mpsc::Sender<Commit>,
    ) -> impl std::future::Future<Output = FetchOutcome> + Send + 'static {
        let api = Arc::clone(&self.api);
        let page_size = self.config.page_size();
        let enrich = self.config.enrich();

        async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return FetchOutcome::Failed {
                        repository: repository.full_name,
                        error: "Semaphore closed unexpectedly".to_string(),
                    }
                }
            };
            fetch_commits(api.as_ref(), &repository, page_size, enrich, &sender).await
        }
    }
}
