//! User Lookup Module
//!
//! Read-through point and batch lookups of user documents in front of a
//! [`DocumentStore`], backed by a [`CacheStore`] of redacted records.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use super::record::UserRecord;
use super::store::{Document, DocumentStore, Filter, Projection, ID_FIELD, INTERNAL_ID_FIELD};
use crate::cache::CacheStore;
use crate::error::{CacheError, Result};

/// Prefix of every user cache key.
pub const USER_KEY_PREFIX: &str = "user:";

/// Builds the cache key for a user id.
pub fn cache_key(user_id: &str) -> String {
    format!("{}{}", USER_KEY_PREFIX, user_id)
}

// == User Lookup ==
/// Cached access to the user collection.
///
/// Cached copies may lag the store by up to the cache TTL unless the writer
/// calls [`UserLookup::invalidate`] after committing. [`UserLookup::update_user`]
/// does that for callers that write through this type.
///
/// Reads that miss take the cache generation before querying the store. If the
/// user is invalidated while the query is in flight, the fetched record is
/// still returned to that caller but is not cached.
#[derive(Clone)]
pub struct UserLookup {
    store: Arc<dyn DocumentStore>,
    cache: Arc<CacheStore<UserRecord>>,
}

impl UserLookup {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<CacheStore<UserRecord>>) -> Self {
        Self { store, cache }
    }

    /// The cache this lookup populates.
    pub fn cache(&self) -> &Arc<CacheStore<UserRecord>> {
        &self.cache
    }

    // == Get By Id ==
    /// Returns the redacted user with `user_id`, or `None` if no such user.
    ///
    /// An empty id short-circuits to `None` without touching cache or store.
    /// A missing user is not cached, so every miss goes back to the store.
    pub async fn get_by_id(&self, user_id: &str) -> Result<Option<UserRecord>> {
        if user_id.is_empty() {
            return Ok(None);
        }

        let key = cache_key(user_id);
        if let Some(cached) = self.cache.get(&key) {
            return Ok(Some(cached));
        }

        let generation = self.cache.generation();
        let Some(doc) = self
            .store
            .find_one(&Filter::IdEq(user_id.to_string()))
            .await?
        else {
            debug!(user_id, "user not found");
            return Ok(None);
        };

        let record = UserRecord::redact(doc);
        if !self.cache.set_if_generation(key, generation, record.clone()) {
            debug!(user_id, "user invalidated during fetch, not caching");
        }
        Ok(Some(record))
    }

    // == Get Many By Ids ==
    /// Returns the users found among `user_ids`, keyed by id.
    ///
    /// Cache hits are answered directly; all misses are fetched with a single
    /// store query. Ids that match no user are absent from the map.
    pub async fn get_many_by_ids<S: AsRef<str>>(
        &self,
        user_ids: &[S],
    ) -> Result<HashMap<String, UserRecord>> {
        let mut found = HashMap::new();
        if user_ids.is_empty() {
            return Ok(found);
        }

        let mut seen = HashSet::new();
        let mut pending = Vec::new();
        for raw in user_ids {
            let id: &str = raw.as_ref();
            if id.is_empty() || !seen.insert(id) {
                continue;
            }
            match self.cache.get(&cache_key(id)) {
                Some(record) => {
                    found.insert(id.to_string(), record);
                }
                None => pending.push(id.to_string()),
            }
        }

        if pending.is_empty() {
            return Ok(found);
        }

        debug!(
            hits = found.len(),
            misses = pending.len(),
            "batch user lookup"
        );

        let generation = self.cache.generation();
        let docs = self
            .store
            .find(&Filter::IdIn(pending), &Projection::redacted())
            .await?;

        for doc in docs {
            // The projection already excludes these fields; redact anyway so
            // a store that ignores projections cannot leak into the cache.
            let record = UserRecord::redact(doc);
            let Some(id) = record.id().map(str::to_string) else {
                warn!("batch lookup returned a user document without an id");
                continue;
            };
            if !self
                .cache
                .set_if_generation(cache_key(&id), generation, record.clone())
            {
                debug!(user_id = %id, "user invalidated during batch fetch, not caching");
            }
            found.insert(id, record);
        }

        Ok(found)
    }

    // == Invalidate ==
    /// Drops the cached copy of `user_id` so the next read hits the store.
    pub fn invalidate(&self, user_id: &str) {
        if self.cache.delete(&cache_key(user_id)) {
            debug!(user_id, "user cache entry invalidated");
        }
    }

    // == Update User ==
    /// Writes `fields` into the user document, then invalidates its cache entry.
    ///
    /// Returns false if the user does not exist.
    pub async fn update_user(&self, user_id: &str, fields: Document) -> Result<bool> {
        if user_id.is_empty() {
            return Err(CacheError::InvalidRequest("user id cannot be empty".into()));
        }
        if fields.is_empty() {
            return Err(CacheError::InvalidRequest("no fields to update".into()));
        }
        if let Some(field) = [ID_FIELD, INTERNAL_ID_FIELD]
            .into_iter()
            .find(|f| fields.contains_key(*f))
        {
            return Err(CacheError::InvalidRequest(format!(
                "field '{}' cannot be updated",
                field
            )));
        }

        let result = self.store.update_one(user_id, fields).await;
        // A failed write may still have landed; drop the cached copy either way.
        self.invalidate(user_id);
        Ok(result?)
    }
}
