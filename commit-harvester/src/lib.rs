#![doc = include_str!(concat!("../", env!("CARGO_PKG_README")))]

pub mod api;
pub mod commits;
pub mod config;
pub mod enrichment;
pub mod repositories;
pub mod runner;
pub mod summary;
pub mod writer;

pub use api::{BitbucketClient, HostingApi, SourceError};
pub use commits::{fetch_commits, Commit};
pub use config::{
    default_cursor_date, output_filename, resolve_date, resolve_total, ConfigError, FileConfig,
};
pub use enrichment::extract_subdomains;
pub use repositories::{list_repositories, Cursor, RepositoryDescriptor, RepositoryPage};
pub use runner::{Runner, RunnerConfig, RunnerError};
pub use summary::{FetchOutcome, RunSummary};
pub use writer::{drain, CommitWriter, WriterError, WriterReport};
