//! Memory Storage Module
//!
//! In-memory backend: encoded objects in a HashMap with LRU count-limit
//! eviction and TTL expiration.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockWriteGuard};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::MemoryConfig;
use crate::error::{Result, StorageError};
use crate::storage::{
    current_timestamp_ms, validate_key, CacheStats, CacheStorage, Entry, Expiry, LruTracker,
    MAX_VALUE_SIZE,
};

// == Stored Record ==
/// Internal representation of one entry: encoded payload plus metadata.
#[derive(Debug, Clone)]
struct StoredRecord {
    payload: Vec<u8>,
    created_at: u64,
    expires_at: Option<u64>,
}

impl StoredRecord {
    fn is_expired_at(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(expires) if now >= expires)
    }
}

// == Memory Storage ==
/// In-memory cache backend.
///
/// Objects are kept as their serde_json encoding so retrieval with a
/// mismatched type surfaces as a decode failure, exactly as it would on
/// disk. Interior locking makes a shared instance usable from the
/// expiration sweep task.
#[derive(Debug)]
pub struct MemoryStorage {
    inner: RwLock<MemoryInner>,
    /// Maximum entry count before LRU eviction, 0 = unlimited
    count_limit: usize,
    /// Expiry applied when `set_object` receives none
    default_expiry: Expiry,
}

#[derive(Debug)]
struct MemoryInner {
    entries: HashMap<String, StoredRecord>,
    lru: LruTracker,
    stats: CacheStats,
}

impl MemoryStorage {
    // == Constructor ==
    /// Creates a new memory backend from its configuration.
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            inner: RwLock::new(MemoryInner {
                entries: HashMap::new(),
                lru: LruTracker::new(),
                stats: CacheStats::new(),
            }),
            count_limit: config.count_limit,
            default_expiry: config.default_expiry,
        }
    }

    // == Stats ==
    /// Returns a snapshot of the performance counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }

    // == Length ==
    /// Returns the current number of entries.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns true if the backend holds no entries.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    // A poisoned lock only means another thread panicked mid-operation;
    // the map itself stays structurally valid, so keep serving.
    fn lock(&self) -> RwLockWriteGuard<'_, MemoryInner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new(MemoryConfig::default())
    }
}

impl CacheStorage for MemoryStorage {
    fn entry<T: DeserializeOwned>(&self, key: &str) -> Result<Entry<T>> {
        let mut inner = self.lock();

        let Some(record) = inner.entries.get(key).cloned() else {
            inner.stats.record_miss();
            return Err(StorageError::NotFound(key.to_string()));
        };

        // Lazy expiration: reading an expired entry removes it
        if record.is_expired_at(current_timestamp_ms()) {
            inner.entries.remove(key);
            inner.lru.remove(key);
            let len = inner.entries.len();
            inner.stats.record_expirations(1);
            inner.stats.record_miss();
            inner.stats.set_total_entries(len);
            return Err(StorageError::Expired(key.to_string()));
        }

        match serde_json::from_slice::<T>(&record.payload) {
            Ok(object) => {
                inner.stats.record_hit();
                inner.lru.touch(key);
                Ok(Entry::new(object, record.created_at, record.expires_at))
            }
            Err(source) => {
                inner.stats.record_miss();
                Err(StorageError::Decode {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    fn set_object<T: Serialize>(
        &self,
        key: &str,
        object: &T,
        expiry: Option<Expiry>,
    ) -> Result<()> {
        validate_key(key)?;

        let payload = serde_json::to_vec(object).map_err(StorageError::Encode)?;
        if payload.len() > MAX_VALUE_SIZE {
            return Err(StorageError::ValueTooLarge(format!(
                "Encoded value exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        let record = StoredRecord {
            payload,
            created_at: current_timestamp_ms(),
            expires_at: expiry.unwrap_or(self.default_expiry).expires_at_ms(),
        };

        let mut inner = self.lock();

        // If inserting a new key at capacity, evict the least recently used
        let is_overwrite = inner.entries.contains_key(key);
        if !is_overwrite && self.count_limit > 0 && inner.entries.len() >= self.count_limit {
            if let Some(evicted) = inner.lru.evict_oldest() {
                inner.entries.remove(&evicted);
                inner.stats.record_eviction();
                debug!(key = %evicted, "Evicted least recently used entry");
            }
        }

        inner.entries.insert(key.to_string(), record);
        inner.lru.touch(key);
        let len = inner.entries.len();
        inner.stats.set_total_entries(len);

        Ok(())
    }

    fn remove_object(&self, key: &str) -> Result<()> {
        let mut inner = self.lock();
        if inner.entries.remove(key).is_some() {
            inner.lru.remove(key);
            let len = inner.entries.len();
            inner.stats.set_total_entries(len);
            Ok(())
        } else {
            Err(StorageError::NotFound(key.to_string()))
        }
    }

    fn remove_all(&self) -> Result<()> {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.lru.clear();
        inner.stats.set_total_entries(0);
        Ok(())
    }

    fn remove_expired_objects(&self) -> Result<usize> {
        let now = current_timestamp_ms();
        let mut inner = self.lock();

        let expired_keys: Vec<String> = inner
            .entries
            .iter()
            .filter(|(_, record)| record.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        let count = expired_keys.len();
        for key in expired_keys {
            inner.entries.remove(&key);
            inner.lru.remove(&key);
        }

        let len = inner.entries.len();
        inner.stats.record_expirations(count as u64);
        inner.stats.set_total_entries(len);

        Ok(count)
    }
}
