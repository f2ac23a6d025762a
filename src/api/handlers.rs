//! API Handlers
//!
//! HTTP request handlers for the user lookup and general cache endpoints.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use tracing::info;

use crate::cache::CacheStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    BatchLookupRequest, BatchLookupResponse, CacheStatsView, DeleteResponse, GetResponse,
    InvalidateResponse, SetRequest, SetResponse, StatsResponse,
};
use crate::users::{Document, DocumentStore, UserLookup, UserRecord};

/// Application state shared across all handlers.
///
/// Both caches guard themselves, so the state is cheap to clone and needs no
/// outer lock.
#[derive(Clone)]
pub struct AppState {
    /// General-purpose cache for arbitrary JSON values
    pub cache: Arc<CacheStore<Value>>,
    /// Cached user lookups
    pub users: UserLookup,
}

impl AppState {
    pub fn new(cache: Arc<CacheStore<Value>>, users: UserLookup) -> Self {
        Self { cache, users }
    }

    /// Creates the application state from configuration and a document store.
    pub fn from_config(config: &Config, store: Arc<dyn DocumentStore>) -> Self {
        let cache = Arc::new(CacheStore::with_ttl_secs(config.generic_cache_ttl));
        let user_cache = Arc::new(CacheStore::with_ttl_secs(config.user_cache_ttl));
        Self::new(cache, UserLookup::new(store, user_cache))
    }
}

/// Handler for GET /users/:id
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<UserRecord>> {
    state
        .users
        .get_by_id(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| CacheError::NotFound(format!("user '{}'", user_id)))
}

/// Handler for POST /users/lookup
///
/// Unknown ids are reported in `missing`, not as an error.
pub async fn batch_lookup_handler(
    State(state): State<AppState>,
    Json(req): Json<BatchLookupRequest>,
) -> Result<Json<BatchLookupResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let users = state.users.get_many_by_ids(req.ids.as_slice()).await?;
    Ok(Json(BatchLookupResponse::new(&req.ids, users)))
}

/// Handler for PATCH /users/:id
///
/// Writes through the lookup so the cached copy is invalidated, then returns
/// the fresh record.
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Json(fields): Json<Document>,
) -> Result<Json<UserRecord>> {
    if !state.users.update_user(&user_id, fields).await? {
        return Err(CacheError::NotFound(format!("user '{}'", user_id)));
    }
    info!(user_id = %user_id, "user updated");

    state
        .users
        .get_by_id(&user_id)
        .await?
        .map(Json)
        .ok_or_else(|| CacheError::NotFound(format!("user '{}'", user_id)))
}

/// Handler for DELETE /users/:id/cache
pub async fn invalidate_user_handler(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<InvalidateResponse> {
    state.users.invalidate(&user_id);
    Json(InvalidateResponse::new(user_id))
}

/// Handler for PUT /cache
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    state.cache.set(req.key.clone(), req.value);
    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /cache/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .cache
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(format!("key '{}'", key)))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Json<DeleteResponse> {
    let deleted = state.cache.delete(&key);
    Json(DeleteResponse::new(key, deleted))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let generic = CacheStatsView::new(state.cache.ttl().as_secs(), &state.cache.stats());
    let user_cache = state.users.cache();
    let users = CacheStatsView::new(user_cache.ttl().as_secs(), &user_cache.stats());

    Json(StatsResponse::new(generic, users))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::test_support::CountingStore;
    use serde_json::json;

    fn test_state() -> (AppState, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::seeded());
        let state = AppState::from_config(&Config::default(), store.clone());
        (state, store)
    }

    #[tokio::test]
    async fn test_get_user_handler() {
        let (state, _) = test_state();

        let response = get_user_handler(State(state.clone()), Path("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.id(), Some("u1"));
        assert!(!response.contains_field("password_hash"));

        let result = get_user_handler(State(state), Path("ghost".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_batch_lookup_handler() {
        let (state, store) = test_state();

        let req = BatchLookupRequest {
            ids: vec!["u1".into(), "u2".into(), "nobody".into()],
        };
        let response = batch_lookup_handler(State(state), Json(req)).await.unwrap();

        assert_eq!(response.users.len(), 2);
        assert_eq!(response.missing, vec!["nobody".to_string()]);
        assert_eq!(store.find_calls(), 1);
    }

    #[tokio::test]
    async fn test_update_user_handler_returns_fresh_record() {
        let (state, _) = test_state();

        let cached = get_user_handler(State(state.clone()), Path("u2".to_string()))
            .await
            .unwrap();
        assert_eq!(cached.get("city"), None);

        let fields = json!({"city": "Zion"}).as_object().cloned().unwrap();
        let response = update_user_handler(State(state), Path("u2".to_string()), Json(fields))
            .await
            .unwrap();

        assert_eq!(response.get("city"), Some(&json!("Zion")));
    }

    #[tokio::test]
    async fn test_update_unknown_user() {
        let (state, _) = test_state();

        let fields = json!({"city": "Zion"}).as_object().cloned().unwrap();
        let result =
            update_user_handler(State(state), Path("ghost".to_string()), Json(fields)).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalidate_handler() {
        let (state, store) = test_state();

        let first = get_user_handler(State(state.clone()), Path("u1".to_string()))
            .await
            .unwrap();
        let response = invalidate_user_handler(State(state.clone()), Path("u1".to_string())).await;
        assert_eq!(response.user_id, "u1");
        let second = get_user_handler(State(state), Path("u1".to_string()))
            .await
            .unwrap();

        assert_eq!(first.id(), second.id());
        assert_eq!(store.find_one_calls(), 2);
    }

    #[tokio::test]
    async fn test_generic_cache_handlers() {
        let (state, _) = test_state();

        let req = SetRequest {
            key: "feed:top".to_string(),
            value: json!([1, 2, 3]),
        };
        let response = set_handler(State(state.clone()), Json(req)).await.unwrap();
        assert_eq!(response.key, "feed:top");

        let response = get_handler(State(state.clone()), Path("feed:top".to_string()))
            .await
            .unwrap();
        assert_eq!(response.value, json!([1, 2, 3]));

        let deleted = delete_handler(State(state.clone()), Path("feed:top".to_string())).await;
        assert!(deleted.deleted);
        let deleted = delete_handler(State(state.clone()), Path("feed:top".to_string())).await;
        assert!(!deleted.deleted);

        let result = get_handler(State(state), Path("feed:top".to_string())).await;
        assert!(matches!(result, Err(CacheError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_invalid_request() {
        let (state, _) = test_state();

        let req = SetRequest {
            key: "".to_string(),
            value: Value::Null,
        };
        let result = set_handler(State(state), Json(req)).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_stats_handler() {
        let (state, _) = test_state();

        let user = get_user_handler(State(state.clone()), Path("u1".to_string()))
            .await
            .unwrap();
        assert_eq!(user.id(), Some("u1"));

        let response = stats_handler(State(state)).await;
        assert_eq!(response.users.ttl_seconds, 120);
        assert_eq!(response.users.misses, 1);
        assert_eq!(response.users.total_entries, 1);
        assert_eq!(response.generic.ttl_seconds, 300);
    }
}
