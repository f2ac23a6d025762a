//! Cache Module
//!
//! Provides an in-memory key/value cache with lazy TTL expiration.

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::{CacheStore, ExpirySweep, Generation, NamedStore};

// == Public Constants ==
/// TTL of the general-purpose cache instance, in seconds
pub const DEFAULT_GENERIC_TTL_SECS: u64 = 300;

/// TTL of the user cache instance, in seconds
pub const DEFAULT_USER_TTL_SECS: u64 = 120;

/// Maximum allowed key length in bytes for keys set over HTTP
pub const MAX_KEY_LENGTH: usize = 256;
