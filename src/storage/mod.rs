//! Storage Module
//!
//! Defines the cache storage contract and its memory and disk backends.

mod disk;
mod entry;
mod expiry;
mod lru;
mod memory;
mod stats;


// Re-export public types
pub use disk::DiskStorage;
pub use entry::{current_timestamp_ms, Entry};
pub use expiry::Expiry;
pub use lru::LruTracker;
pub use memory::MemoryStorage;
pub use stats::CacheStats;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};

// == Public Constants ==
/// Maximum allowed key length in bytes
pub const MAX_KEY_LENGTH: usize = 256;

/// Maximum allowed encoded value size in bytes
pub const MAX_VALUE_SIZE: usize = 1024 * 1024; // 1 MB

// == Cache Storage Contract ==
/// Capability set every cache backend must expose.
///
/// Values are stored in encoded form, so retrieval is generic over any
/// deserializable type; asking for a type the stored bytes do not match
/// surfaces as [`StorageError::Decode`]. All state lives in the backend;
/// the contract itself is stateless.
pub trait CacheStorage: Send + Sync {
    /// Retrieves the stored value plus its metadata for `key`.
    ///
    /// Fails with [`StorageError::NotFound`] if the key is absent and
    /// [`StorageError::Expired`] if its entry has passed its expiration
    /// (the entry is removed on the spot).
    fn entry<T: DeserializeOwned>(&self, key: &str) -> Result<Entry<T>>;

    /// Stores `object` under `key`, overwriting any existing entry.
    ///
    /// A `None` expiry falls back to the backend's configured default.
    fn set_object<T: Serialize>(
        &self,
        key: &str,
        object: &T,
        expiry: Option<Expiry>,
    ) -> Result<()>;

    /// Removes the entry for `key`.
    ///
    /// Fails with [`StorageError::NotFound`] if the key is absent; a failed
    /// removal never affects other keys.
    fn remove_object(&self, key: &str) -> Result<()>;

    /// Removes every entry unconditionally.
    fn remove_all(&self) -> Result<()>;

    /// Removes entries whose recorded expiration has passed.
    ///
    /// Entries without expiration metadata are retained. Returns the number
    /// of entries removed.
    fn remove_expired_objects(&self) -> Result<usize>;

    /// Retrieves just the stored value for `key`.
    fn object<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        Ok(self.entry(key)?.object)
    }

    /// Checks whether `key` currently holds a value decodable as `T`.
    ///
    /// Collapses every failure kind into `false`: a missing key, an expired
    /// entry, a type mismatch, and a backend I/O failure are all
    /// indistinguishable through this method.
    fn exists_object<T: DeserializeOwned>(&self, key: &str) -> bool {
        self.object::<T>(key).is_ok()
    }
}

// == Key Validation ==
/// Validates a key against the contract limits.
pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.len() > MAX_KEY_LENGTH {
        return Err(StorageError::InvalidKey(format!(
            "Key exceeds maximum length of {} bytes",
            MAX_KEY_LENGTH
        )));
    }
    Ok(())
}
