//! Expiration Sweep Task
//!
//! Background task that periodically removes expired entries from a shared
//! storage backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::storage::CacheStorage;

/// Spawns a background task that periodically removes expired entries.
///
/// Works against any backend through the [`CacheStorage`] contract. The
/// task loops forever, sleeping for the configured interval between
/// sweeps; a sweep failure is logged and the task keeps running.
///
/// # Arguments
/// * `storage` - Shared storage backend to sweep
/// * `sweep_interval_secs` - Interval in seconds between sweeps
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort it
/// during shutdown.
///
/// # Example
/// ```ignore
/// let storage = Arc::new(MemoryStorage::default());
/// let sweep_handle = spawn_sweep_task(storage.clone(), 1);
/// // Later, during shutdown:
/// sweep_handle.abort();
/// ```
pub fn spawn_sweep_task<S>(storage: Arc<S>, sweep_interval_secs: u64) -> JoinHandle<()>
where
    S: CacheStorage + 'static,
{
    let interval = Duration::from_secs(sweep_interval_secs);

    tokio::spawn(async move {
        info!(
            "Starting expiration sweep task with interval of {} seconds",
            sweep_interval_secs
        );

        loop {
            tokio::time::sleep(interval).await;

            match storage.remove_expired_objects() {
                Ok(0) => debug!("Expiration sweep: no expired entries found"),
                Ok(removed) => info!("Expiration sweep: removed {} expired entries", removed),
                Err(err) => warn!("Expiration sweep failed: {}", err),
            }
        }
    })
}
