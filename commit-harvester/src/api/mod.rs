//! Access to the remote hosting API.
//!
//! The pipeline only ever talks to the remote side through [`HostingApi`], so
//! the orchestrator and fetchers can be driven by in-memory fakes in tests.
//! [`BitbucketClient`] is the production implementation.

mod client;
mod error;
pub mod wire;

pub use client::{BitbucketClient, DEFAULT_API_URL, DEFAULT_WEB_URL};
pub use error::SourceError;

use crate::repositories::Cursor;
use async_trait::async_trait;
use wire::{CommitPageResponse, RepositoryPageResponse};

#[cfg(test)]
use mockall::automock;

/// The remote calls the harvesting pipeline depends on.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HostingApi: Send + Sync {
    /// Fetches one page of repositories bounded by `cursor`.
    async fn repository_page(
        &self,
        page_size: u32,
        cursor: &Cursor,
    ) -> Result<RepositoryPageResponse, SourceError>;

    /// Fetches the first page of commits for the repository `full_name` ("owner/slug").
    async fn commit_page(
        &self,
        full_name: &str,
        page_size: u32,
    ) -> Result<CommitPageResponse, SourceError>;

    /// Retrieves the raw patch body behind a commit's patch link.
    async fn patch(&self, patch_url: &str) -> Result<String, SourceError>;
}
