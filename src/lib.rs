//! Lisbon real-estate opportunity listings: loading, caching, filtering
//! and summary statistics.

pub mod config;
pub mod error;
pub mod filters;
pub mod models;
pub mod sources;
pub mod storage;
pub mod store;

pub use config::Config;
pub use error::LoadError;
pub use filters::{apply_filters, compute_statistics, FilterSet, SortOrder, Statistics};
pub use models::{Category, Listing, Snapshot, Typology};
pub use store::{DataOrigin, ListingStore, LoadReport, RefreshOutcome};
