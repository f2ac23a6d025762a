//! Response DTOs for the cache service API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;

use crate::cache::CacheStats;
use crate::users::UserRecord;

/// Response body for reading from the general cache (GET /cache/:key)
#[derive(Debug, Clone, Serialize)]
pub struct GetResponse {
    pub key: String,
    pub value: Value,
}

impl GetResponse {
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Response body for storing into the general cache (PUT /cache)
#[derive(Debug, Clone, Serialize)]
pub struct SetResponse {
    /// Success message
    pub message: String,
    /// The key that was set
    pub key: String,
}

impl SetResponse {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            message: format!("Key '{}' set successfully", key),
            key,
        }
    }
}

/// Response body for deleting from the general cache (DELETE /cache/:key)
///
/// Deleting an absent key is not an error; `deleted` reports whether an
/// entry was actually removed.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub key: String,
    pub deleted: bool,
}

impl DeleteResponse {
    pub fn new(key: impl Into<String>, deleted: bool) -> Self {
        Self {
            key: key.into(),
            deleted,
        }
    }
}

/// Response body for a batch user lookup (POST /users/lookup)
#[derive(Debug, Clone, Serialize)]
pub struct BatchLookupResponse {
    /// Users found, keyed by id
    pub users: HashMap<String, UserRecord>,
    /// Requested ids with no matching user, in request order
    pub missing: Vec<String>,
}

impl BatchLookupResponse {
    pub fn new(requested: &[String], users: HashMap<String, UserRecord>) -> Self {
        let mut seen = HashSet::new();
        let missing = requested
            .iter()
            .filter(|id| !users.contains_key(id.as_str()) && seen.insert(id.as_str()))
            .cloned()
            .collect();
        Self { users, missing }
    }
}

/// Response body for dropping a cached user (DELETE /users/:id/cache)
#[derive(Debug, Clone, Serialize)]
pub struct InvalidateResponse {
    pub message: String,
    pub user_id: String,
}

impl InvalidateResponse {
    pub fn new(user_id: impl Into<String>) -> Self {
        let user_id = user_id.into();
        Self {
            message: format!("Cache entry for user '{}' invalidated", user_id),
            user_id,
        }
    }
}

/// Statistics of one cache instance
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatsView {
    pub ttl_seconds: u64,
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
    pub discarded_fills: u64,
    pub total_entries: usize,
    /// Hit rate (hits / (hits + misses))
    pub hit_rate: f64,
}

impl CacheStatsView {
    pub fn new(ttl_seconds: u64, stats: &CacheStats) -> Self {
        Self {
            ttl_seconds,
            hits: stats.hits,
            misses: stats.misses,
            expirations: stats.expirations,
            discarded_fills: stats.discarded_fills,
            total_entries: stats.total_entries,
            hit_rate: stats.hit_rate(),
        }
    }
}

/// Response body for the stats endpoint (GET /stats)
#[derive(Debug, Clone, Serialize)]
pub struct StatsResponse {
    pub generic: CacheStatsView,
    pub users: CacheStatsView,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl StatsResponse {
    pub fn new(generic: CacheStatsView, users: CacheStatsView) -> Self {
        Self {
            generic,
            users,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
