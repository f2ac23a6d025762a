//! ZION.CITY user cache
//!
//! Read-through TTL caching and batched user lookups in front of the user
//! document collection, served over a small HTTP API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod users;

pub use api::AppState;
pub use config::Config;
pub use tasks::spawn_cleanup_task;
