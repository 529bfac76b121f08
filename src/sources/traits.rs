use crate::error::Result;
use crate::models::Snapshot;
use async_trait::async_trait;

/// A remote place listing snapshots can be fetched from
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetch the latest snapshot, returning it with the raw body
    /// so the caller can cache exactly what was received
    async fn fetch(&self) -> Result<FetchedSnapshot>;

    /// Get the name of the source
    fn source_name(&self) -> &'static str;
}

/// A parsed snapshot plus the JSON it was parsed from
#[derive(Debug, Clone)]
pub struct FetchedSnapshot {
    pub snapshot: Snapshot,
    pub raw: String,
}
