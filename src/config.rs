//! Configuration Module
//!
//! Backend configuration structures with sensible defaults.

use std::path::PathBuf;

use crate::storage::Expiry;

// == Memory Config ==
/// Configuration for the in-memory backend.
#[derive(Debug, Clone)]
pub struct MemoryConfig {
    /// Maximum number of entries before LRU eviction kicks in (0 = unlimited)
    pub count_limit: usize,
    /// Expiry applied when `set_object` is called without one
    pub default_expiry: Expiry,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            count_limit: 0,
            default_expiry: Expiry::Never,
        }
    }
}

// == Disk Config ==
/// Configuration for the disk backend.
#[derive(Debug, Clone)]
pub struct DiskConfig {
    /// Cache name; becomes the subdirectory holding its record files
    pub name: String,
    /// Parent directory for the cache subdirectory
    pub directory: PathBuf,
    /// Expiry applied when `set_object` is called without one
    pub default_expiry: Expiry,
}

impl Default for DiskConfig {
    fn default() -> Self {
        Self {
            name: "keystash".to_string(),
            directory: std::env::temp_dir(),
            default_expiry: Expiry::Never,
        }
    }
}
