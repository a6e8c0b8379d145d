//! Key-value storage and task persistence
//!
//! The whole task collection lives in a single named slot of a key-value
//! store. [`KeyValueStore`] is the injected slot provider; [`TaskPersistence`]
//! serializes the collection into it.

mod file;
mod memory;
mod persistence;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use persistence::{TaskPersistence, STORAGE_KEY};

use crate::Result;

/// A string-to-string store with single-key atomic writes
pub trait KeyValueStore {
    /// Read the value stored under `key`, if any
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Overwrite the value stored under `key`
    fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<()>;

    /// Check whether `key` holds a value
    fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }
}
