use crate::config::Config;
use crate::error::{LoadError, Result};
use crate::models::Snapshot;
use crate::sources::traits::{FetchedSnapshot, ListingSource};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("lisboa-scout/", env!("CARGO_PKG_VERSION"));

/// Fetches the exported snapshot from a static JSON file over HTTP
pub struct RemoteSource {
    client: Client,
    url: String,
}

impl RemoteSource {
    /// Create a remote source for the snapshot URL the config resolves to
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Self::with_url(config, config.snapshot_url())
    }

    /// Create a remote source for an explicit URL
    pub fn with_url(config: &Config, url: impl Into<String>) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(client, url))
    }

    /// Create a remote source around an already configured client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ListingSource for RemoteSource {
    async fn fetch(&self) -> Result<FetchedSnapshot> {
        debug!("Fetching URL: {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            warn!("Remote returned status: {}", response.status());
            return Err(LoadError::Status(response.status()));
        }

        let raw = response.text().await?;
        debug!("Downloaded {} bytes of JSON", raw.len());

        let snapshot = Snapshot::from_json(&raw).map_err(LoadError::Payload)?;
        info!("Fetched {} listings from {}", snapshot.properties.len(), self.url);

        Ok(FetchedSnapshot { snapshot, raw })
    }

    fn source_name(&self) -> &'static str {
        "remote"
    }
}
