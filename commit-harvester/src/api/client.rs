//! HTTP client for the Bitbucket Cloud REST API.

use super::wire::{CommitPageResponse, RepositoryPageResponse};
use super::{HostingApi, SourceError};
use crate::repositories::Cursor;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Default API root.
pub const DEFAULT_API_URL: &str = "https://api.bitbucket.org/2.0";

/// Default web root used to build repository links.
pub const DEFAULT_WEB_URL: &str = "https://bitbucket.org";

/// Unauthenticated Bitbucket API client.
#[derive(Debug, Clone)]
pub struct BitbucketClient {
    http: reqwest::Client,
    api_url: Url,
}

impl BitbucketClient {
    /// Builds a client rooted at `api_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(api_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(timeout)
            .build()?;
        Ok(Self { http, api_url })
    }

    /// URL of the repository listing for `cursor`.
    fn repository_page_url(&self, page_size: u32, cursor: &Cursor) -> Result<Url, SourceError> {
        match cursor {
            Cursor::UpdatedAfter(timestamp) => {
                let mut url = self.endpoint(&["repositories"]);
                url.query_pairs_mut()
                    .append_pair("pagelen", &page_size.to_string())
                    .append_pair("after", timestamp);
                Ok(url)
            }
            Cursor::Continue(next) => parse_url(next),
        }
    }

    /// URL of the commit listing for `full_name`.
    fn commit_page_url(&self, full_name: &str, page_size: u32) -> Url {
        let mut segments = vec!["repositories"];
        segments.extend(full_name.split('/').filter(|s| !s.is_empty()));
        segments.push("commits");

        let mut url = self.endpoint(&segments);
        url.query_pairs_mut()
            .append_pair("pagelen", &page_size.to_string());
        url
    }

    /// Appends path segments to the API root.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, SourceError> {
        let url_string = url.to_string();
        let body = self.get_text(url).await?;
        serde_json::from_str(&body).map_err(|source| SourceError::Decode {
            url: url_string,
            source,
        })
    }

    async fn get_text(&self, url: Url) -> Result<String, SourceError> {
        let url_string = url.to_string();
        debug!(url = %url_string, "GET");

        let response =
            self.http
                .get(url)
                .send()
                .await
                .map_err(|source| SourceError::Unavailable {
                    url: url_string.clone(),
                    source,
                })?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                url: url_string,
                status: status.as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|source| SourceError::Unavailable {
                url: url_string,
                source,
            })
    }
}

#[async_trait]
impl HostingApi for BitbucketClient {
    async fn repository_page(
        &self,
        page_size: u32,
        cursor: &Cursor,
    ) -> Result<RepositoryPageResponse, SourceError> {
        let url = self.repository_page_url(page_size, cursor)?;
        self.get_json(url).await
    }

    async fn commit_page(
        &self,
        full_name: &str,
        page_size: u32,
    ) -> Result<CommitPageResponse, SourceError> {
        let url = self.commit_page_url(full_name, page_size);
        self.get_json(url).await
    }

    async fn patch(&self, patch_url: &str) -> Result<String, SourceError> {
        let url = parse_url(patch_url)?;
        self.get_text(url).await
    }
}

fn parse_url(raw: &str) -> Result<Url, SourceError> {
    Url::parse(raw).map_err(|source| SourceError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
