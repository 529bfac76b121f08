use crate::error::{LoadError, Result};
use crate::models::{Listing, Snapshot};
use tracing::info;

/// Sample Lisbon listings compiled into the binary
const BUNDLED_LISTINGS: &str = include_str!("../../data/listings.json");

/// Static dataset used when nothing has been cached yet
#[derive(Debug, Clone)]
pub struct BundledDataset {
    raw: &'static str,
}

impl Default for BundledDataset {
    fn default() -> Self {
        Self {
            raw: BUNDLED_LISTINGS,
        }
    }
}

impl BundledDataset {
    /// Dataset backed by arbitrary static JSON instead of the compiled-in file
    pub fn from_static(raw: &'static str) -> Self {
        Self { raw }
    }

    pub fn listings(&self) -> Result<Vec<Listing>> {
        let snapshot = Snapshot::from_json(self.raw).map_err(LoadError::BundledParse)?;
        info!("📋 Loaded {} bundled listings", snapshot.properties.len());
        Ok(snapshot.properties)
    }
}
