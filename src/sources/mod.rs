pub mod bundled;
pub mod remote;
pub mod traits;

pub use bundled::BundledDataset;
pub use remote::RemoteSource;
pub use traits::{FetchedSnapshot, ListingSource};
