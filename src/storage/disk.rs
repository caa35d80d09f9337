//! Disk Storage Module
//!
//! File-backed backend: one JSON record per key, named by the SHA-256
//! digest of the key so any key maps to a safe, stable file name.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::config::DiskConfig;
use crate::error::{Result, StorageError};
use crate::storage::{
    current_timestamp_ms, validate_key, CacheStorage, Entry, Expiry, MAX_VALUE_SIZE,
};

// == Disk Record ==
/// On-disk representation of one entry.
///
/// The original key is stored inside the record; the file name only holds
/// its digest.
#[derive(Debug, Serialize, Deserialize)]
struct DiskRecord {
    key: String,
    created_at: u64,
    expires_at: Option<u64>,
    payload: serde_json::Value,
}

impl DiskRecord {
    fn is_expired_at(&self, now: u64) -> bool {
        matches!(self.expires_at, Some(expires) if now >= expires)
    }
}

// == Disk Storage ==
/// File-backed cache backend.
///
/// Entries survive process restarts; a new instance pointed at the same
/// directory sees everything a previous one stored.
#[derive(Debug)]
pub struct DiskStorage {
    /// Directory holding this cache's record files
    directory: PathBuf,
    /// Expiry applied when `set_object` receives none
    default_expiry: Expiry,
}

impl DiskStorage {
    // == Constructor ==
    /// Creates the backend, creating its cache directory if needed.
    pub fn new(config: DiskConfig) -> Result<Self> {
        let directory = config.directory.join(&config.name);
        fs::create_dir_all(&directory)?;
        Ok(Self {
            directory,
            default_expiry: config.default_expiry,
        })
    }

    /// Returns the directory holding this cache's files.
    pub fn directory(&self) -> &PathBuf {
        &self.directory
    }

    fn file_path(&self, key: &str) -> PathBuf {
        let digest = Sha256::digest(key.as_bytes());
        self.directory.join(format!("{}.json", hex::encode(digest)))
    }

    fn read_record(&self, key: &str) -> Result<DiskRecord> {
        let path = self.file_path(key);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound(key.to_string()));
            }
            Err(err) => return Err(StorageError::Io(err)),
        };
        serde_json::from_slice(&bytes).map_err(|source| StorageError::Decode {
            key: key.to_string(),
            source,
        })
    }
}

impl CacheStorage for DiskStorage {
    fn entry<T: DeserializeOwned>(&self, key: &str) -> Result<Entry<T>> {
        let record = self.read_record(key)?;

        // Lazy expiration: reading an expired entry removes its file
        if record.is_expired_at(current_timestamp_ms()) {
            if let Err(err) = fs::remove_file(self.file_path(key)) {
                if err.kind() != ErrorKind::NotFound {
                    return Err(StorageError::Io(err));
                }
            }
            return Err(StorageError::Expired(key.to_string()));
        }

        let object =
            serde_json::from_value(record.payload).map_err(|source| StorageError::Decode {
                key: key.to_string(),
                source,
            })?;
        Ok(Entry::new(object, record.created_at, record.expires_at))
    }

    fn set_object<T: Serialize>(
        &self,
        key: &str,
        object: &T,
        expiry: Option<Expiry>,
    ) -> Result<()> {
        validate_key(key)?;

        let payload = serde_json::to_value(object).map_err(StorageError::Encode)?;
        let record = DiskRecord {
            key: key.to_string(),
            created_at: current_timestamp_ms(),
            expires_at: expiry.unwrap_or(self.default_expiry).expires_at_ms(),
            payload,
        };
        let bytes = serde_json::to_vec(&record).map_err(StorageError::Encode)?;
        if bytes.len() > MAX_VALUE_SIZE {
            return Err(StorageError::ValueTooLarge(format!(
                "Encoded record exceeds maximum size of {} bytes",
                MAX_VALUE_SIZE
            )));
        }

        fs::write(self.file_path(key), bytes)?;
        Ok(())
    }

    fn remove_object(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.file_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(err) => Err(StorageError::Io(err)),
        }
    }

    fn remove_all(&self) -> Result<()> {
        for dirent in fs::read_dir(&self.directory)? {
            let path = dirent?.path();
            if path.is_file() {
                fs::remove_file(path)?;
            }
        }
        Ok(())
    }

    fn remove_expired_objects(&self) -> Result<usize> {
        let now = current_timestamp_ms();
        let mut removed = 0;

        for dirent in fs::read_dir(&self.directory)? {
            let path = dirent?.path();
            if !path.is_file() {
                continue;
            }

            // A file that cannot be parsed is not known to be expired;
            // leave it alone rather than destroy data during a sweep.
            let record: DiskRecord = match fs::read(&path)
                .ok()
                .and_then(|bytes| serde_json::from_slice(&bytes).ok())
            {
                Some(record) => record,
                None => {
                    warn!(path = %path.display(), "Skipping unreadable record during expiration sweep");
                    continue;
                }
            };

            if record.is_expired_at(now) {
                fs::remove_file(&path)?;
                debug!(key = %record.key, "Removed expired entry");
                removed += 1;
            }
        }

        Ok(removed)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MAX_KEY_LENGTH;
    use std::thread::sleep;
    use std::time::Duration;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct User {
        name: String,
        age: u32,
    }

    fn storage_in(dir: &TempDir) -> DiskStorage {
        DiskStorage::new(DiskConfig {
            name: "test".to_string(),
            directory: dir.path().to_path_buf(),
            default_expiry: Expiry::Never,
        })
        .unwrap()
    }

    #[test]
    fn test_set_and_object_roundtrip() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        let user = User {
            name: "bob".to_string(),
            age: 44,
        };

        storage.set_object("user", &user, None).unwrap();
        let loaded: User = storage.object("user").unwrap();

        assert_eq!(loaded, user);
    }

    #[test]
    fn test_entry_carries_metadata() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage
            .set_object("key", &"value".to_string(), Some(Expiry::Seconds(60)))
            .unwrap();

        let entry: Entry<String> = storage.entry("key").unwrap();
        assert_eq!(entry.object, "value");
        assert!(entry.expires_at.is_some());
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_object_nonexistent_key() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let result = storage.object::<String>("nonexistent");
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_persistence_across_instances() {
        let dir = TempDir::new().unwrap();
        {
            let storage = storage_in(&dir);
            storage.set_object("key", &7u32, None).unwrap();
        }

        let reopened = storage_in(&dir);
        assert_eq!(reopened.object::<u32>("key").unwrap(), 7);
    }

    #[test]
    fn test_keys_with_path_hostile_characters() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);

        let key = "users/../;:*?<>|\\weird key";
        storage.set_object(key, &"value".to_string(), None).unwrap();

        assert_eq!(storage.object::<String>(key).unwrap(), "value");
    }

    #[test]
    fn test_remove_object() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.set_object("key", &1u32, None).unwrap();

        storage.remove_object("key").unwrap();

        assert!(matches!(
            storage.object::<u32>("key"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_object_nonexistent() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.set_object("other", &1u32, None).unwrap();

        let result = storage.remove_object("nonexistent");

        assert!(matches!(result, Err(StorageError::NotFound(_))));
        assert!(storage.exists_object::<u32>("other"));
    }

    #[test]
    fn test_remove_all() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.set_object("k1", &1u32, None).unwrap();
        storage.set_object("k2", &2u32, None).unwrap();

        storage.remove_all().unwrap();

        assert!(!storage.exists_object::<u32>("k1"));
        assert!(!storage.exists_object::<u32>("k2"));
    }

    #[test]
    fn test_expired_entry_removed_on_read() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage
            .set_object("key", &1u32, Some(Expiry::Seconds(1)))
            .unwrap();

        sleep(Duration::from_millis(1100));

        let result = storage.object::<u32>("key");
        assert!(matches!(result, Err(StorageError::Expired(_))));
        // File is gone; a second read reports not found
        assert!(matches!(
            storage.object::<u32>("key"),
            Err(StorageError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_expired_objects() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage
            .set_object("short", &1u32, Some(Expiry::Seconds(1)))
            .unwrap();
        storage
            .set_object("long", &2u32, Some(Expiry::Seconds(60)))
            .unwrap();
        storage.set_object("forever", &3u32, None).unwrap();

        sleep(Duration::from_millis(1100));

        let removed = storage.remove_expired_objects().unwrap();

        assert_eq!(removed, 1);
        assert!(storage.exists_object::<u32>("long"));
        assert!(storage.exists_object::<u32>("forever"));
        assert!(!storage.exists_object::<u32>("short"));
    }

    #[test]
    fn test_sweep_skips_unreadable_files() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage.set_object("key", &1u32, None).unwrap();

        fs::write(storage.directory().join("garbage.json"), b"not json").unwrap();

        // Sweep must not delete what it cannot parse
        assert_eq!(storage.remove_expired_objects().unwrap(), 0);
        assert!(storage.directory().join("garbage.json").exists());
        assert!(storage.exists_object::<u32>("key"));
    }

    #[test]
    fn test_decode_mismatch() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        storage
            .set_object("key", &"not a number".to_string(), None)
            .unwrap();

        let result = storage.object::<u32>("key");
        assert!(matches!(result, Err(StorageError::Decode { .. })));
        assert!(!storage.exists_object::<u32>("key"));
        assert!(storage.exists_object::<String>("key"));
    }

    #[test]
    fn test_expiry_date_in_the_past() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        let past = chrono::Utc::now() - chrono::Duration::seconds(5);

        storage
            .set_object("key", &1u32, Some(Expiry::Date(past)))
            .unwrap();

        assert!(matches!(
            storage.object::<u32>("key"),
            Err(StorageError::Expired(_))
        ));
    }

    #[test]
    fn test_key_too_long() {
        let dir = TempDir::new().unwrap();
        let storage = storage_in(&dir);
        let long_key = "x".repeat(MAX_KEY_LENGTH + 1);

        let result = storage.set_object(&long_key, &1u32, None);
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
