//! Key-value storage the listing store caches into.
//!
//! The store only needs string get/set/remove/clear, so anything from a
//! directory of files to a test double can back it.

pub mod file;
pub mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use crate::error::Result;

/// Storage capability injected into the listing store
pub trait KeyValueStore: Send + Sync {
    /// Read a value, `None` if the key was never written
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete a single key; missing keys are not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// Delete every key this storage owns
    fn clear(&self) -> Result<()>;
}
