//! Optional TOML config file.

use crate::config::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings read from a config file. Every key is optional; command line
/// flags take precedence over anything set here.
///
/// ```toml
/// api-url = "https://api.bitbucket.org/2.0"
/// page-size = 50
/// concurrency = 4
/// enrich = true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct FileConfig {
    /// API root URL.
    pub api_url: Option<String>,

    /// Web root used to build repository links.
    pub web_url: Option<String>,

    /// Repositories and commits requested per page.
    pub page_size: Option<u32>,

    /// Maximum fetchers running at once.
    pub concurrency: Option<usize>,

    /// Result channel capacity.
    pub channel_capacity: Option<usize>,

    /// Maximum repository pages to request.
    pub max_pages: Option<usize>,

    /// Per-request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Directory the output file is created in.
    pub output_dir: Option<PathBuf>,

    /// Whether to scan patches for subdomains.
    pub enrich: Option<bool>,
}

impl FileConfig {
    /// Loads a config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or is not valid TOML
    /// for this schema.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        debug!(path = %path.display(), "Loading config file");

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError {
            path: path.display().to_string(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::TomlError {
            path: path.display().to_string(),
            source: e,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn loads_partial_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harvester.toml");
        fs::write(
            &path,
            r#"
api-url = "http://localhost:9000/2.0"
page-size = 25
enrich = true
output-dir = "out"
"#,
        )
        .unwrap();

        let config = FileConfig::load(&path).unwrap();

        assert_eq!(config.api_url.as_deref(), Some("http://localhost:9000/2.0"));
        assert_eq!(config.page_size, Some(25));
        assert_eq!(config.enrich, Some(true));
        assert_eq!(config.output_dir, Some(PathBuf::from("out")));
        assert_eq!(config.concurrency, None);
    }

    #[test]
    fn rejects_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("harvester.toml");
        fs::write(&path, "pagelen = 10\n").unwrap();

        let result = FileConfig::load(&path);
        assert!(matches!(result, Err(ConfigError::TomlError { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let temp = TempDir::new().unwrap();

        let result = FileConfig::load(&temp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::IoError { .. })));
    }
}
