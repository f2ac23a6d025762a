//! API Module
//!
//! HTTP handlers and routing for the user cache service.
//!
//! # Endpoints
//! - `GET /users/:id`, `PATCH /users/:id` - Single user read / write-through
//! - `POST /users/lookup` - Batch user lookup
//! - `DELETE /users/:id/cache` - User cache invalidation
//! - `PUT /cache`, `GET /cache/:key`, `DELETE /cache/:key` - General cache
//! - `GET /stats` - Cache statistics

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
