//! API Routes
//!
//! Configures the Axum router with all service endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    batch_lookup_handler, delete_handler, get_handler, get_user_handler, invalidate_user_handler,
    set_handler, stats_handler, update_user_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /users/:id` - Fetch one user (cached)
/// - `PATCH /users/:id` - Update a user and invalidate its cache entry
/// - `POST /users/lookup` - Batch fetch users by id
/// - `DELETE /users/:id/cache` - Drop a user's cache entry
/// - `PUT /cache` - Store a JSON value in the general cache
/// - `GET /cache/:key` - Read from the general cache
/// - `DELETE /cache/:key` - Delete from the general cache
/// - `GET /stats` - Statistics for both caches
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/users/lookup", post(batch_lookup_handler))
        .route("/users/:id", get(get_user_handler).patch(update_user_handler))
        .route("/users/:id/cache", delete(invalidate_user_handler))
        .route("/cache", put(set_handler))
        .route("/cache/:key", get(get_handler).delete(delete_handler))
        .route("/stats", get(stats_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
