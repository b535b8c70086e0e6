//! Response shapes returned by the Bitbucket `2.0` API.
//!
//! Only the fields the harvester reads are modelled. Fields inside an entry
//! that the API may omit or fill with unexpected values are decoded leniently
//! and fall back to their defaults, so one odd entry never fails a whole page.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

/// A paginated listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Paginated<T> {
    /// Entries on this page. Required, so an error body served with a
    /// success status fails to decode instead of reading as an empty page.
    pub values: Vec<T>,

    /// URL of the following page, if any.
    #[serde(default)]
    pub next: Option<String>,
}

/// Response of `GET /repositories`.
pub type RepositoryPageResponse = Paginated<RepositoryEntry>;

/// Response of `GET /repositories/{workspace}/{slug}/commits`.
pub type CommitPageResponse = Paginated<CommitEntry>;

/// One repository in a repository listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RepositoryEntry {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub full_name: String,

    #[serde(default)]
    pub updated_on: String,

    #[serde(default, deserialize_with = "lenient")]
    pub project: ProjectEntry,
}

/// The project a repository belongs to.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectEntry {
    #[serde(default)]
    pub key: String,

    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "lenient")]
    pub links: ProjectLinks,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectLinks {
    #[serde(default, deserialize_with = "lenient")]
    pub html: Link,
}

/// One commit in a commit listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub hash: String,

    #[serde(default, deserialize_with = "lenient")]
    pub date: String,

    #[serde(default, deserialize_with = "lenient")]
    pub message: String,

    #[serde(default, deserialize_with = "lenient")]
    pub author: AuthorEntry,

    #[serde(default, deserialize_with = "lenient")]
    pub links: CommitLinks,
}

/// Commit author. `user` is absent when the author email is not linked to an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthorEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub user: UserEntry,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserEntry {
    #[serde(default)]
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitLinks {
    #[serde(default, rename = "self", deserialize_with = "lenient")]
    pub self_link: Link,

    #[serde(default, deserialize_with = "lenient")]
    pub patch: Link,
}

/// A `{"href": ...}` link object.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Link {
    #[serde(default)]
    pub href: String,
}

/// Decodes `T`, substituting `T::default()` for `null` or mistyped values.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_repository_page() {
        let body = r#"{
            "pagelen": 2,
            "values": [
                {
                    "name": "widgets",
                    "full_name": "acme/widgets",
                    "updated_on": "2024-11-02T10:00:00.000000+00:00",
                    "project": {
                        "key": "ACME",
                        "name": "Acme",
                        "links": { "html": { "href": "https://bitbucket.org/acme/workspace/projects/ACME" } }
                    }
                },
                { "name": "orphan", "full_name": "solo/orphan", "updated_on": "2024-11-03T00:00:00+00:00" }
            ],
            "next": "https://api.bitbucket.org/2.0/repositories?pagelen=2&after=2024-11-03"
        }"#;

        let page: RepositoryPageResponse = serde_json::from_str(body).unwrap();

        assert_eq!(page.values.len(), 2);
        assert_eq!(page.values[0].project.key, "ACME");
        assert_eq!(
            page.values[0].project.links.html.href,
            "https://bitbucket.org/acme/workspace/projects/ACME"
        );
        assert_eq!(page.values[1].project.key, "");
        assert!(page.next.is_some());
    }

    #[test]
    fn missing_author_user_degrades_to_empty() {
        let body = r#"{
            "values": [
                {
                    "hash": "abc123",
                    "date": "2024-11-02T10:00:00+00:00",
                    "message": "Fix build",
                    "author": { "raw": "Jo <jo@example.com>" },
                    "links": {
                        "self": { "href": "https://api.bitbucket.org/2.0/repositories/acme/widgets/commit/abc123" },
                        "patch": { "href": "https://api.bitbucket.org/2.0/repositories/acme/widgets/patch/abc123" }
                    }
                }
            ]
        }"#;

        let page: CommitPageResponse = serde_json::from_str(body).unwrap();
        let commit = &page.values[0];

        assert_eq!(commit.author.user.display_name, "");
        assert!(commit.links.patch.href.ends_with("/patch/abc123"));
        assert!(page.next.is_none());
    }

    #[test]
    fn malformed_nested_fields_degrade_to_empty() {
        let body = r#"{
            "values": [
                { "hash": "def456", "author": { "user": "not-an-object" }, "links": null },
                { "hash": "0a1b2c", "date": null, "message": null },
                { "hash": 42, "message": ["not", "a", "string"] }
            ]
        }"#;

        let page: CommitPageResponse = serde_json::from_str(body).unwrap();
        let commit = &page.values[0];

        assert_eq!(commit.hash, "def456");
        assert_eq!(commit.author.user.display_name, "");
        assert_eq!(commit.links.self_link.href, "");
        assert_eq!(commit.message, "");

        assert_eq!(page.values.len(), 3);
        assert_eq!(page.values[1].hash, "0a1b2c");
        assert_eq!(page.values[1].date, "");
        assert_eq!(page.values[1].message, "");
        assert_eq!(page.values[2].hash, "");
        assert_eq!(page.values[2].message, "");
    }

    #[test]
    fn rejects_non_listing_body() {
        let result = serde_json::from_str::<CommitPageResponse>(r#"{"values": "nope"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_page_without_values() {
        let bodies = [
            r#"{"type": "error", "error": {"message": "Something went wrong"}}"#,
            r#"{}"#,
            r#"{"next": "https://api.bitbucket.org/2.0/repositories?page=2"}"#,
        ];

        for body in bodies {
            assert!(serde_json::from_str::<RepositoryPageResponse>(body).is_err());
            assert!(serde_json::from_str::<CommitPageResponse>(body).is_err());
        }
    }

    #[test]
    fn empty_values_is_an_empty_page() {
        let page: RepositoryPageResponse = serde_json::from_str(r#"{"values": []}"#).unwrap();
        assert!(page.values.is_empty());
        assert!(page.next.is_none());
    }
}
