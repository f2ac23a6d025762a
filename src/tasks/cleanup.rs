//! TTL Cleanup Task
//!
//! Background task that periodically sweeps expired cache entries. Reads
//! already drop stale entries, so this only reclaims memory held by keys that
//! are never read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::ExpirySweep;

/// Spawns a background task that periodically clears expired entries from
/// every store in `stores`.
///
/// Returns the task handle so it can be aborted during graceful shutdown.
///
/// # Example
/// ```ignore
/// let users = Arc::new(CacheStore::<UserRecord>::with_ttl_secs(120));
/// let sweep: Arc<dyn ExpirySweep> = Arc::new(NamedStore { name: "users".into(), store: users });
/// let handle = spawn_cleanup_task(vec![sweep], 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_cleanup_task(
    stores: Vec<Arc<dyn ExpirySweep>>,
    cleanup_interval_secs: u64,
) -> JoinHandle<()> {
    // A zero period would panic in tokio::time::interval
    let period = Duration::from_secs(cleanup_interval_secs.max(1));

    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task for {} caches with interval of {} seconds",
            stores.len(),
            period.as_secs()
        );

        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;

            for store in &stores {
                let removed = store.sweep();
                if removed > 0 {
                    info!(cache = store.name(), removed, "TTL cleanup removed expired entries");
                } else {
                    debug!(cache = store.name(), "TTL cleanup: no expired entries found");
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheStore, NamedStore};

    fn named(name: &str, store: &Arc<CacheStore<String>>) -> Arc<dyn ExpirySweep> {
        Arc::new(NamedStore {
            name: name.to_string(),
            store: Arc::clone(store),
        })
    }

    #[tokio::test]
    async fn test_cleanup_task_removes_expired_entries() {
        let short = Arc::new(CacheStore::new(Duration::from_millis(100)));
        let long = Arc::new(CacheStore::with_ttl_secs(3600));

        short.set("expire_soon", "value".to_string());
        long.set("long_lived", "value".to_string());

        let handle = spawn_cleanup_task(vec![named("short", &short), named("long", &long)], 1);

        // Entry expires after 100ms, first sweep runs at 1s
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert!(
            !short.contains_key_raw("expire_soon"),
            "Expired entry should have been swept"
        );
        assert_eq!(long.get("long_lived").as_deref(), Some("value"));

        handle.abort();
    }

    #[tokio::test]
    async fn test_cleanup_task_can_be_aborted() {
        let store = Arc::new(CacheStore::with_ttl_secs(300));
        let handle = spawn_cleanup_task(vec![named("generic", &store)], 1);

        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
