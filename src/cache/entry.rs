//! Cache Entry Module
//!
//! Defines a single cached value together with the moment it was inserted.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// Represents a single cache entry with value and insertion time.
///
/// Entries carry no TTL of their own; the owning store applies one TTL to all
/// of them.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// When the entry was inserted or last overwritten
    pub inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry stamped with the current time.
    pub fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    // == Age ==
    /// Time elapsed since the entry was inserted.
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    // == Is Expired ==
    /// Checks if the entry has outlived `ttl`.
    ///
    /// Boundary condition: an entry is valid only while its age is strictly
    /// less than the TTL, so an age equal to the TTL counts as expired.
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() >= ttl
    }

    // == Time To Live ==
    /// Returns the remaining lifetime under `ttl`, saturating at zero.
    pub fn ttl_remaining(&self, ttl: Duration) -> Duration {
        ttl.saturating_sub(self.age())
    }
}
