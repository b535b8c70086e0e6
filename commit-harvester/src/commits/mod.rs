//! Per-repository commit fetching.
//!
//! A fetcher pushes each commit into the result channel as soon as it is
//! ready instead of returning a collection, so the writer can persist while
//! other repositories are still being fetched.

mod commit;

pub use commit::Commit;

use crate::api::HostingApi;
use crate::enrichment::extract_subdomains;
use crate::repositories::RepositoryDescriptor;
use crate::summary::FetchOutcome;
use tokio::sync::mpsc;
use tracing::{debug, error, info, info_span, warn, Instrument};

/// Fetches the first commit page of `repository` and pushes every commit into `sender`.
///
/// Commits are pushed in the order the API returned them. With `enrich` set,
/// each commit's patch is retrieved and scanned for subdomains; a commit whose
/// patch cannot be retrieved is skipped rather than pushed without them.
///
/// Failures never propagate: a failed commit listing is logged and reported
/// as [`FetchOutcome::Failed`], and a closed channel ends the fetch early with
/// [`FetchOutcome::Interrupted`].
pub async fn fetch_commits(
    api: &dyn HostingApi,
    repository: &RepositoryDescriptor,
    page_size: u32,
    enrich: bool,
    sender: &mpsc::Sender<Commit>,
) -> FetchOutcome {
    let span = info_span!("fetch", repo = %repository.full_name);

    async {
        let page = match api.commit_page(&repository.full_name, page_size).await {
            Ok(page) => page,
            Err(e) => {
                error!(error = %e, "Failed to fetch commits");
                return FetchOutcome::Failed {
                    repository: repository.full_name.clone(),
                    error: e.to_string(),
                };
            }
        };

        debug!(count = page.values.len(), "Fetched commit page");

        let mut pushed = 0;
        let mut dropped = 0;

        for entry in page.values {
            let mut commit = Commit::from_entry(entry, repository);

            if enrich {
                match api.patch(&commit.patch_link).await {
                    Ok(body) => commit.subdomains = Some(extract_subdomains(&body)),
                    Err(e) => {
                        warn!(hash = %commit.hash, error = %e, "Skipping commit, patch unavailable");
                        dropped += 1;
                        continue;
                    }
                }
            }

            if sender.send(commit).await.is_err() {
                debug!(pushed, "Result channel closed, stopping");
                return FetchOutcome::Interrupted {
                    repository: repository.full_name.clone(),
                    pushed,
                    dropped,
                };
            }
            pushed += 1;
        }

        info!(pushed, dropped, "Repository fetched");
        FetchOutcome::Completed {
            repository: repository.full_name.clone(),
            pushed,
            dropped,
        }
    }
    .instrument(span)
    .await
}
