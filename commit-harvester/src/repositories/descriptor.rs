//! Repository descriptor.

use crate::api::wire::RepositoryEntry;
use serde::Serialize;

/// A repository returned by the listing, reduced to what commit fetching needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RepositoryDescriptor {
    /// Repository slug.
    pub name: String,

    /// Full repository name in "workspace/slug" format.
    pub full_name: String,

    /// Last update timestamp reported by the API.
    pub updated_at: String,

    /// Browser URL of the repository.
    pub repository_url: String,

    pub project_key: String,
    pub project_name: String,
    pub project_url: String,
}

impl RepositoryDescriptor {
    /// Maps a listing entry, building the repository link under `web_url`.
    pub(crate) fn from_entry(entry: RepositoryEntry, web_url: &str) -> Self {
        let repository_url = format!("{}/{}", web_url.trim_end_matches('/'), entry.full_name);
        Self {
            name: entry.name,
            full_name: entry.full_name,
            updated_at: entry.updated_on,
            repository_url,
            project_key: entry.project.key,
            project_name: entry.project.name,
            project_url: entry.project.links.html.href,
        }
    }
}
