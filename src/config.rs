//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use crate::cache::{DEFAULT_GENERIC_TTL_SECS, DEFAULT_USER_TTL_SECS};

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// TTL in seconds for the general-purpose cache
    pub generic_cache_ttl: u64,
    /// TTL in seconds for the user cache
    pub user_cache_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds
    pub cleanup_interval: u64,
    /// Optional JSON array of user documents loaded into the in-memory store
    pub user_seed_file: Option<PathBuf>,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `GENERIC_CACHE_TTL` - General cache TTL in seconds (default: 300)
    /// - `USER_CACHE_TTL` - User cache TTL in seconds (default: 120)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 60)
    /// - `USER_SEED_FILE` - Path to seed users from (default: unset)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            generic_cache_ttl: parse_var("GENERIC_CACHE_TTL").unwrap_or(defaults.generic_cache_ttl),
            user_cache_ttl: parse_var("USER_CACHE_TTL").unwrap_or(defaults.user_cache_ttl),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            user_seed_file: env::var_os("USER_SEED_FILE").map(PathBuf::from),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            generic_cache_ttl: DEFAULT_GENERIC_TTL_SECS,
            user_cache_ttl: DEFAULT_USER_TTL_SECS,
            server_port: 3000,
            cleanup_interval: 60,
            user_seed_file: None,
        }
    }
}
