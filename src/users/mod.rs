//! Users Module
//!
//! Cached user lookups in front of the user document collection.

mod lookup;
mod record;
pub mod registry;
mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use lookup::{cache_key, UserLookup, USER_KEY_PREFIX};
pub use record::{UserRecord, REDACTED_FIELDS};
pub use store::{
    Document, DocumentStore, Filter, MemoryDocumentStore, Projection, StoreError, ID_FIELD,
    INTERNAL_ID_FIELD, PASSWORD_HASH_FIELD,
};
