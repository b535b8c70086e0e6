//! Runner configuration.

use crate::api::{DEFAULT_API_URL, DEFAULT_WEB_URL};
use crate::config::{output_filename, ConfigError, FileConfig};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Repositories and commits requested per page when unset.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// Largest page the API serves.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Fetchers running at once when unset.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Result channel capacity when unset.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Per-request timeout when unset.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for one harvesting run.
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    /// Requested number of records.
    total: usize,
    /// Repositories updated after this timestamp are listed.
    date: String,
    /// Invocation time; names the output file.
    started_at: DateTime<Local>,
    /// Directory the output file is created in.
    output_dir: PathBuf,
    /// API root URL.
    api_url: String,
    /// Web root used to build repository links.
    web_url: String,
    /// Repositories and commits requested per page.
    page_size: u32,
    /// Maximum fetchers running at once.
    concurrency: usize,
    /// Result channel capacity.
    channel_capacity: usize,
    /// Maximum repository pages to request.
    max_pages: usize,
    /// Per-request timeout.
    timeout: Duration,
    /// Whether to scan patches for subdomains.
    enrich: bool,
}

impl RunnerConfig {
    /// Creates a configuration for a run of `total` records listed from `date`.
    ///
    /// Both values are expected to be resolved already, see
    /// [`resolve_total`](crate::config::resolve_total) and
    /// [`resolve_date`](crate::config::resolve_date).
    pub fn new(total: usize, date: String) -> Self {
        Self {
            total,
            date,
            started_at: Local::now(),
            output_dir: PathBuf::from("."),
            api_url: DEFAULT_API_URL.to_string(),
            web_url: DEFAULT_WEB_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            max_pages: 1,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            enrich: false,
        }
    }

    /// Applies every setting present in a config file.
    pub fn with_file_config(mut self, file: &FileConfig) -> Self {
        if let Some(api_url) = &file.api_url {
            self.api_url = api_url.clone();
        }
        if let Some(web_url) = &file.web_url {
            self.web_url = web_url.clone();
        }
        if let Some(page_size) = file.page_size {
            self.page_size = page_size;
        }
        if let Some(concurrency) = file.concurrency {
            self.concurrency = concurrency;
        }
        if let Some(channel_capacity) = file.channel_capacity {
            self.channel_capacity = channel_capacity;
        }
        if let Some(max_pages) = file.max_pages {
            self.max_pages = max_pages;
        }
        if let Some(timeout_secs) = file.timeout_secs {
            self.timeout = Duration::from_secs(timeout_secs);
        }
        if let Some(output_dir) = &file.output_dir {
            self.output_dir = output_dir.clone();
        }
        if let Some(enrich) = file.enrich {
            self.enrich = enrich;
        }
        self
    }

    /// Sets the invocation time.
    pub fn with_started_at(mut self, started_at: DateTime<Local>) -> Self {
        self.started_at = started_at;
        self
    }

    /// Sets the output directory.
    pub fn with_output_dir(mut self, output_dir: PathBuf) -> Self {
        self.output_dir = output_dir;
        self
    }

    /// Sets the API root URL.
    pub fn with_api_url(mut self, api_url: String) -> Self {
        self.api_url = api_url;
        self
    }

    /// Sets the web root used to build repository links.
    pub fn with_web_url(mut self, web_url: String) -> Self {
        self.web_url = web_url;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the maximum number of fetchers running at once.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    /// Sets the result channel capacity.
    pub fn with_channel_capacity(mut self, channel_capacity: usize) -> Self {
        self.channel_capacity = channel_capacity;
        self
    }

    /// Sets the maximum number of repository pages to request.
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables subdomain enrichment.
    pub fn with_enrich(mut self, enrich: bool) -> Self {
        self.enrich = enrich;
        self
    }

    /// Checks every setting is in range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] naming the first offending setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.total == 0 {
            return Err(ConfigError::InvalidTotal { value: 0 });
        }
        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(invalid(
                "page-size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        if self.concurrency == 0 {
            return Err(invalid("concurrency", "must be at least 1".to_string()));
        }
        if self.channel_capacity == 0 {
            return Err(invalid("channel-capacity", "must be at least 1".to_string()));
        }
        if self.max_pages == 0 {
            return Err(invalid("max-pages", "must be at least 1".to_string()));
        }
        self.parsed_api_url()?;
        Ok(())
    }

    /// Returns the API root as a URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ValidationError`] unless the API root is an
    /// absolute `http` or `https` URL.
    pub fn parsed_api_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| invalid("api-url", format!("'{}': {e}", self.api_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(
                "api-url",
                format!("'{}' is not an http(s) URL", self.api_url),
            ));
        }
        Ok(url)
    }

    /// Returns the requested number of records.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the cursor date.
    pub fn date(&self) -> &str {
        &self.date
    }

    /// Returns the invocation time.
    pub fn started_at(&self) -> DateTime<Local> {
        self.started_at
    }

    /// Returns the output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Returns the full path of this run's output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(output_filename(&self.started_at))
    }

    /// Returns the API root URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the web root URL.
    pub fn web_url(&self) -> &str {
        &self.web_url
    }

    /// Returns the page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Returns the maximum number of fetchers running at once.
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the result channel capacity.
    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// Returns the maximum number of repository pages to request.
    pub fn max_pages(&self) -> usize {
        self.max_pages
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns whether subdomain enrichment is enabled.
    pub fn enrich(&self) -> bool {
        self.enrich
    }
}

fn invalid(field: &str, message: String) -> ConfigError {
    ConfigError::ValidationError {
        field: field.to_string(),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> RunnerConfig {
        RunnerConfig::new(100, "2024-11-15".to_string())
    }

    #[test]
    fn defaults_are_valid() {
        let config = config();

        assert!(config.validate().is_ok());
        assert_eq!(config.page_size(), DEFAULT_PAGE_SIZE);
        assert_eq!(config.max_pages(), 1);
        assert!(!config.enrich());
    }

    #[test]
    fn file_config_overrides_defaults() {
        let file = FileConfig {
            page_size: Some(20),
            enrich: Some(true),
            output_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };

        let config = config().with_file_config(&file);

        assert_eq!(config.page_size(), 20);
        assert!(config.enrich());
        assert_eq!(config.output_dir(), Path::new("out"));
        assert_eq!(config.concurrency(), DEFAULT_CONCURRENCY);
    }

    #[test]
    fn explicit_settings_override_file_config() {
        let file = FileConfig {
            page_size: Some(20),
            ..Default::default()
        };

        let config = config().with_file_config(&file).with_page_size(30);

        assert_eq!(config.page_size(), 30);
    }

    #[test]
    fn rejects_out_of_range_page_size() {
        for page_size in [0, MAX_PAGE_SIZE + 1] {
            let result = config().with_page_size(page_size).validate();
            assert!(matches!(
                result,
                Err(ConfigError::ValidationError { ref field, .. }) if field == "page-size"
            ));
        }
    }

    #[test]
    fn rejects_non_http_api_url() {
        let result = config()
            .with_api_url("file:///tmp/api".to_string())
            .validate();
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));

        let result = config().with_api_url("not a url".to_string()).validate();
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn output_path_is_named_from_start_time() {
        let started_at = Local.with_ymd_and_hms(2024, 12, 15, 9, 5, 0).unwrap();

        let config = config()
            .with_output_dir(PathBuf::from("out"))
            .with_started_at(started_at);

        assert_eq!(
            config.output_path(),
            PathBuf::from("out/commits_2024-12-15_09-05-00.json")
        );
    }
}
