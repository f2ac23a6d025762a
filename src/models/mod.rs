//! Request and Response models for the cache service API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::{BatchLookupRequest, SetRequest, MAX_BATCH_IDS};
pub use responses::{
    BatchLookupResponse, CacheStatsView, DeleteResponse, ErrorResponse, GetResponse,
    InvalidateResponse, SetResponse, StatsResponse,
};
