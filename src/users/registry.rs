//! Process-wide user lookup installation
//!
//! Code that cannot be handed a [`UserLookup`] explicitly (for example an
//! auth extractor built before the router) reads it from here. The lookup is
//! installed once at startup; asking for it earlier is a configuration error,
//! never an empty result.

use std::collections::HashMap;
use std::sync::OnceLock;

use tracing::info;

use super::lookup::UserLookup;
use super::record::UserRecord;
use crate::error::{CacheError, Result};

static INSTALLED: OnceLock<UserLookup> = OnceLock::new();

/// Installs the process-wide user lookup. Fails if one is already installed.
pub fn install(lookup: UserLookup) -> Result<()> {
    INSTALLED
        .set(lookup)
        .map_err(|_| CacheError::AlreadyConfigured)?;
    info!("user lookup installed");
    Ok(())
}

/// Returns the installed user lookup.
pub fn installed() -> Result<&'static UserLookup> {
    INSTALLED.get().ok_or(CacheError::NotConfigured)
}

/// Fetches one user through the installed lookup.
pub async fn get_user_by_id(user_id: &str) -> Result<Option<UserRecord>> {
    installed()?.get_by_id(user_id).await
}

/// Fetches a batch of users through the installed lookup.
pub async fn get_users_by_ids<S: AsRef<str>>(
    user_ids: &[S],
) -> Result<HashMap<String, UserRecord>> {
    installed()?.get_many_by_ids(user_ids).await
}
