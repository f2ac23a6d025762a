//! Request DTOs for the cache service API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;
use serde_json::Value;

use crate::cache::MAX_KEY_LENGTH;

/// Upper bound on ids accepted by one batch lookup request
pub const MAX_BATCH_IDS: usize = 1000;

/// Request body for storing into the general cache (PUT /cache)
#[derive(Debug, Clone, Deserialize)]
pub struct SetRequest {
    /// The cache key
    pub key: String,
    /// Any JSON value
    pub value: Value,
}

impl SetRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.key.is_empty() {
            return Some("Key cannot be empty".to_string());
        }
        if self.key.len() > MAX_KEY_LENGTH {
            return Some(format!(
                "Key exceeds maximum length of {} bytes",
                MAX_KEY_LENGTH
            ));
        }
        None
    }
}

/// Request body for a batch user lookup (POST /users/lookup)
#[derive(Debug, Clone, Deserialize)]
pub struct BatchLookupRequest {
    pub ids: Vec<String>,
}

impl BatchLookupRequest {
    pub fn validate(&self) -> Option<String> {
        if self.ids.len() > MAX_BATCH_IDS {
            return Some(format!(
                "Batch lookup accepts at most {} ids",
                MAX_BATCH_IDS
            ));
        }
        None
    }
}
