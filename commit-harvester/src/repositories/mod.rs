//! Repository listing.
//!
//! One call to [`list_repositories`] issues exactly one page request. Whether
//! to follow the returned continuation cursor is the orchestrator's decision.

mod cursor;
mod descriptor;

pub use cursor::Cursor;
pub use descriptor::RepositoryDescriptor;

use crate::api::{HostingApi, SourceError};
use tracing::{debug, info};

/// One page of repositories.
#[derive(Debug, Clone, Default)]
pub struct RepositoryPage {
    /// Repositories on this page, in API order.
    pub repositories: Vec<RepositoryDescriptor>,

    /// Cursor for the following page, if the API reported one.
    pub next: Option<Cursor>,
}

/// Lists one page of repositories.
///
/// # Arguments
///
/// * `api` - Hosting API to query
/// * `page_size` - Number of repositories to request
/// * `cursor` - Boundary of the requested page
/// * `web_url` - Web root used to build each repository's browser link
///
/// # Errors
///
/// Returns [`SourceError`] on transport failures, non-success statuses, or
/// responses that do not decode as a repository listing.
pub async fn list_repositories(
    api: &dyn HostingApi,
    page_size: u32,
    cursor: &Cursor,
    web_url: &str,
) -> Result<RepositoryPage, SourceError> {
    debug!(?cursor, page_size, "Requesting repository page");
    let response = api.repository_page(page_size, cursor).await?;

    let repositories: Vec<RepositoryDescriptor> = response
        .values
        .into_iter()
        .map(|entry| RepositoryDescriptor::from_entry(entry, web_url))
        .collect();

    info!(
        count = repositories.len(),
        has_next = response.next.is_some(),
        "Listed repositories"
    );

    Ok(RepositoryPage {
        repositories,
        next: response.next.map(Cursor::Continue),
    })
}
