use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "https://raw.githubusercontent.com";
pub const DEFAULT_GITHUB_REPO: &str = "username/lisboa-real-estate-data";
pub const DEFAULT_BRANCH: &str = "main";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Where the listing data lives and where it is cached
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Host serving the static data files
    pub api_base_url: String,
    /// `owner/name` of the repository the export job publishes to
    pub data_repo: String,
    pub branch: String,
    /// Full URL of the snapshot, overriding base/repo/branch when set
    pub data_url: Option<String>,
    pub cache_dir: PathBuf,
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            data_repo: DEFAULT_GITHUB_REPO.to_string(),
            branch: DEFAULT_BRANCH.to_string(),
            data_url: None,
            cache_dir: default_cache_dir(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Read overrides from `LISBOA_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            api_base_url: non_empty("LISBOA_API_URL").unwrap_or(defaults.api_base_url),
            data_repo: non_empty("LISBOA_GITHUB_REPO").unwrap_or(defaults.data_repo),
            branch: non_empty("LISBOA_DATA_BRANCH").unwrap_or(defaults.branch),
            data_url: non_empty("LISBOA_DATA_URL"),
            cache_dir: non_empty("LISBOA_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.cache_dir),
            request_timeout: non_empty("LISBOA_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        }
    }

    /// URL of the latest snapshot
    pub fn snapshot_url(&self) -> String {
        if let Some(url) = &self.data_url {
            return url.clone();
        }
        format!(
            "{}/{}/{}/data/properties_latest.json",
            self.api_base_url.trim_end_matches('/'),
            self.data_repo.trim_matches('/'),
            self.branch
        )
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lisboa-scout")
}
