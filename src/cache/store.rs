//! Cache Store Module
//!
//! TTL-bounded key/value cache guarded by one store-wide lock.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tracing::trace;

use crate::cache::{CacheEntry, CacheStats};

// == Store Internals ==
#[derive(Debug)]
struct Inner<V> {
    entries: HashMap<String, CacheEntry<V>>,
    stats: CacheStats,
    /// Bumped by every delete
    clock: u64,
    /// Clock value and time of the last delete per key, kept for one TTL
    tombstones: HashMap<String, (u64, Instant)>,
    /// Highest clock value among pruned tombstones
    pruned_floor: u64,
}

// == Generation ==
/// Store clock captured before a read-through fill.
///
/// A fill started at generation `g` is only accepted if the key was not
/// deleted after `g` was taken. See [`CacheStore::set_if_generation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Generation(u64);

// == Cache Store ==
/// TTL cache shared by concurrent request handlers.
///
/// Every operation takes the same mutex for the duration of a single map
/// operation. The lock is never held across an `.await`, so callers in async
/// code can use the store directly without wrapping it in an async lock.
///
/// Expiry is lazy: a stale entry is removed when it is next read, or when
/// [`CacheStore::clear_expired`] runs.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Mutex<Inner<V>>,
    ttl: Duration,
}

impl<V: Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                stats: CacheStats::new(),
                clock: 0,
                tombstones: HashMap::new(),
                pruned_floor: 0,
            }),
            ttl,
        }
    }

    /// Creates an empty store with a TTL given in whole seconds.
    pub fn with_ttl_secs(ttl_secs: u64) -> Self {
        Self::new(Duration::from_secs(ttl_secs))
    }

    // == Get ==
    /// Returns a clone of the value for `key` if it is younger than the TTL.
    ///
    /// An expired entry is removed as part of the same call.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        let expired = match inner.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => {
                inner.stats.record_hit();
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            inner.entries.remove(key);
            inner.stats.record_expirations(1);
            trace!(key, "evicted expired entry on read");
        }
        inner.stats.record_miss();
        None
    }

    // == Set ==
    /// Inserts or overwrites `key`, resetting its insertion time.
    pub fn set(&self, key: impl Into<String>, value: V) {
        let mut inner = self.inner.lock();
        inner.entries.insert(key.into(), CacheEntry::new(value));
    }

    // == Generation ==
    /// Returns the current store clock. Take it before querying the backing
    /// store, then fill with [`CacheStore::set_if_generation`].
    pub fn generation(&self) -> Generation {
        Generation(self.inner.lock().clock)
    }

    // == Set If Generation ==
    /// Inserts `value` unless `key` was deleted after `generation` was taken.
    ///
    /// Returns whether the value was stored. A rejected fill leaves the key
    /// absent, so the next read goes back to the backing store.
    pub fn set_if_generation(
        &self,
        key: impl Into<String>,
        generation: Generation,
        value: V,
    ) -> bool {
        let key = key.into();
        let mut guard = self.inner.lock();
        let inner = &mut *guard;

        // Tombstones older than the floor are gone, so nothing is known about
        // deletes between such a generation and the floor.
        let deleted_since = generation.0 < inner.pruned_floor
            || inner
                .tombstones
                .get(&key)
                .is_some_and(|(stamp, _)| *stamp > generation.0);

        if deleted_since {
            inner.stats.record_discarded_fill();
            trace!(key = %key, "discarded fill that raced a delete");
            return false;
        }

        inner.entries.insert(key, CacheEntry::new(value));
        true
    }

    // == Delete ==
    /// Removes `key` if present. Returns whether an entry was removed.
    ///
    /// The delete is recorded even when nothing was cached, so a fill that
    /// started earlier cannot store a value read before the delete.
    pub fn delete(&self, key: &str) -> bool {
        let mut inner = self.inner.lock();
        inner.clock += 1;
        let stamp = inner.clock;
        inner
            .tombstones
            .insert(key.to_string(), (stamp, Instant::now()));
        inner.entries.remove(key).is_some()
    }

    // == Clear Expired ==
    /// Removes every entry whose age has reached the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn clear_expired(&self) -> usize {
        let mut inner = self.inner.lock();
        let ttl = self.ttl;

        let before = inner.entries.len();
        inner.entries.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before - inner.entries.len();

        let mut floor = inner.pruned_floor;
        inner.tombstones.retain(|_, (stamp, deleted_at)| {
            let keep = deleted_at.elapsed() < ttl;
            if !keep {
                floor = floor.max(*stamp);
            }
            keep
        });
        inner.pruned_floor = floor;

        inner.stats.record_expirations(removed);
        removed
    }

    // == Inspection ==
    /// Returns true if `key` is physically stored, expired or not.
    ///
    /// Unlike [`CacheStore::get`] this applies no expiry and records no stats.
    pub fn contains_key_raw(&self, key: &str) -> bool {
        self.inner.lock().entries.contains_key(key)
    }

    /// Number of physical entries, including expired ones not yet observed.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let mut stats = inner.stats.clone();
        stats.set_total_entries(inner.entries.len());
        stats
    }
}

// == Expiry Sweep ==
/// A cache that can be swept for expired entries by the background task.
pub trait ExpirySweep: Send + Sync {
    /// Name used in sweep logs.
    fn name(&self) -> &str;

    /// Removes expired entries and returns how many were dropped.
    fn sweep(&self) -> usize;
}

/// A [`CacheStore`] paired with a name for sweep logging.
#[derive(Debug)]
pub struct NamedStore<V> {
    pub name: String,
    pub store: std::sync::Arc<CacheStore<V>>,
}

impl<V: Clone + Send> ExpirySweep for NamedStore<V> {
    fn name(&self) -> &str {
        &self.name
    }

    fn sweep(&self) -> usize {
        self.store.clear_expired()
    }
}
