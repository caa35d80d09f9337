//! Error types for the cache storage
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Storage Error Enum ==
/// Unified error type for cache storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Key not found in storage
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Key was found but its entry has expired
    #[error("Key expired: {0}")]
    Expired(String),

    /// Stored bytes could not be reconstructed as the requested type
    #[error("Failed to decode stored object for key '{key}': {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Object could not be encoded for storage
    #[error("Failed to encode object: {0}")]
    Encode(#[source] serde_json::Error),

    /// Backend-level I/O failure
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Key violates storage constraints
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    /// Encoded value exceeds the storage size limit
    #[error("Value too large: {0}")]
    ValueTooLarge(String),
}

// == Result Type Alias ==
/// Convenience Result type for cache storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
