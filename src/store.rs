//! Listing store: owns the current snapshot and the cache around it.
//!
//! `load` and `refresh` never fail the caller. They return a report that
//! says where the data came from, or why none could be had, so a view can
//! tell "no data" apart from "no matches".

use crate::error::LoadError;
use crate::models::{Listing, Snapshot};
use crate::sources::{BundledDataset, ListingSource};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

pub const CACHE_KEY: &str = "properties_cache";
pub const LAST_SYNC_KEY: &str = "last_sync";

/// Where the listings in a report came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataOrigin {
    Cache,
    Bundled,
    Remote,
    /// Every source failed; the listing set is empty
    Unavailable,
}

/// Result of `ListingStore::load`
#[derive(Debug)]
pub struct LoadReport {
    pub origin: DataOrigin,
    pub listings: Arc<Vec<Listing>>,
    /// Failures hit on the way, in the order the sources were tried
    pub issues: Vec<LoadError>,
}

impl LoadReport {
    pub fn is_unavailable(&self) -> bool {
        self.origin == DataOrigin::Unavailable
    }
}

/// Result of `ListingStore::refresh`
#[derive(Debug)]
pub enum RefreshOutcome {
    Updated {
        listings: Arc<Vec<Listing>>,
        synced_at: DateTime<Utc>,
    },
    Failed(LoadError),
}

impl RefreshOutcome {
    /// Fresh listings, or nothing when the fetch failed
    pub fn listings(&self) -> &[Listing] {
        match self {
            RefreshOutcome::Updated { listings, .. } => listings.as_slice(),
            RefreshOutcome::Failed(_) => &[],
        }
    }

    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated { .. })
    }
}

/// Current listing set plus the cache and sources that feed it
pub struct ListingStore {
    storage: Arc<dyn KeyValueStore>,
    remote: Arc<dyn ListingSource>,
    bundled: BundledDataset,
    current: RwLock<Arc<Vec<Listing>>>,
}

impl ListingStore {
    pub fn new(storage: Arc<dyn KeyValueStore>, remote: Arc<dyn ListingSource>) -> Self {
        Self {
            storage,
            remote,
            bundled: BundledDataset::default(),
            current: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// Swap the fallback dataset
    pub fn with_bundled(self, bundled: BundledDataset) -> Self {
        Self { bundled, ..self }
    }

    /// The listing set last installed by `load` or a successful `refresh`
    pub fn current(&self) -> Arc<Vec<Listing>> {
        self.current
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn install(&self, listings: Arc<Vec<Listing>>) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = listings;
    }

    /// Load from the cache, falling back to the bundled dataset
    pub async fn load(&self) -> LoadReport {
        let mut issues = Vec::new();

        match self.storage.get(CACHE_KEY) {
            Ok(Some(raw)) => match Snapshot::from_json(&raw) {
                Ok(snapshot) => {
                    info!("Loaded {} listings from cache", snapshot.properties.len());
                    return self.finish_load(DataOrigin::Cache, snapshot.properties, issues);
                }
                Err(e) => {
                    warn!("Cached snapshot is unreadable, ignoring it: {}", e);
                    issues.push(LoadError::CacheParse(e));
                }
            },
            Ok(None) => debug!("No cached snapshot"),
            Err(e) => {
                warn!("Could not read cache: {}", e);
                issues.push(e);
            }
        }

        match self.bundled.listings() {
            Ok(listings) => self.finish_load(DataOrigin::Bundled, listings, issues),
            Err(e) => {
                warn!("Bundled dataset failed to load: {}", e);
                issues.push(e);
                LoadReport {
                    origin: DataOrigin::Unavailable,
                    listings: Arc::new(Vec::new()),
                    issues,
                }
            }
        }
    }

    fn finish_load(
        &self,
        origin: DataOrigin,
        listings: Vec<Listing>,
        issues: Vec<LoadError>,
    ) -> LoadReport {
        let listings = Arc::new(listings);
        self.install(listings.clone());
        LoadReport {
            origin,
            listings,
            issues,
        }
    }

    /// Fetch from the remote source once; on failure nothing changes
    pub async fn refresh(&self) -> RefreshOutcome {
        info!("Refreshing listings from {} source", self.remote.source_name());

        let fetched = match self.remote.fetch().await {
            Ok(fetched) => fetched,
            Err(e) => {
                warn!("Refresh failed, keeping existing data: {}", e);
                return RefreshOutcome::Failed(e);
            }
        };

        let synced_at = Utc::now();
        match self.storage.set(CACHE_KEY, &fetched.raw) {
            Ok(()) => {
                if let Err(e) = self.storage.set(LAST_SYNC_KEY, &synced_at.to_rfc3339()) {
                    warn!("Could not record sync time: {}", e);
                }
            }
            Err(e) => warn!("Could not cache fetched snapshot: {}", e),
        }

        let listings = Arc::new(fetched.snapshot.properties);
        self.install(listings.clone());
        info!("✅ Refreshed {} listings", listings.len());

        RefreshOutcome::Updated {
            listings,
            synced_at,
        }
    }

    /// When the cache was last filled from the remote source
    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        let raw = match self.storage.get(LAST_SYNC_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                debug!("Could not read sync marker: {}", e);
                return None;
            }
        };
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|t| t.with_timezone(&Utc))
            .ok()
    }

    /// Forget the cached snapshot and sync marker
    pub fn clear_cache(&self) -> crate::error::Result<()> {
        self.storage.remove(CACHE_KEY)?;
        self.storage.remove(LAST_SYNC_KEY)?;
        Ok(())
    }
}
