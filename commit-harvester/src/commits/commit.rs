//! The harvested commit record.

use crate::api::wire::CommitEntry;
use crate::repositories::RepositoryDescriptor;
use serde::{Deserialize, Serialize};

/// One harvested commit, written as one line of the output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub hash: String,
    pub author_name: String,
    pub date: String,
    pub message: String,
    pub patch_link: String,
    pub commit_url: String,
    pub repository_link: String,
    pub project_key: String,
    pub project_name: String,
    pub project_url: String,

    /// Subdomains referenced by the commit's patch. Only present when enrichment ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomains: Option<Vec<String>>,
}

impl Commit {
    /// Builds a commit from a listing entry of `repository`.
    pub(crate) fn from_entry(entry: CommitEntry, repository: &RepositoryDescriptor) -> Self {
        Self {
            hash: entry.hash,
            author_name: entry.author.user.display_name,
            date: entry.date,
            message: entry.message,
            patch_link: entry.links.patch.href,
            commit_url: entry.links.self_link.href,
            repository_link: repository.repository_url.clone(),
            project_key: repository.project_key.clone(),
            project_name: repository.project_name.clone(),
            project_url: repository.project_url.clone(),
            subdomains: None,
        }
    }
}
