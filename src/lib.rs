//! Keystash - A typed key-value cache library
//!
//! Stores any serde-serializable object under a string key, with optional
//! TTL expiration. Ships an in-memory backend with LRU count-limit eviction
//! and a file-per-key disk backend, plus a background sweep task that
//! removes expired entries.

pub mod config;
pub mod error;
pub mod storage;
pub mod tasks;

pub use config::{DiskConfig, MemoryConfig};
pub use error::{Result, StorageError};
pub use storage::{CacheStorage, DiskStorage, Entry, Expiry, MemoryStorage};
pub use tasks::spawn_sweep_task;
