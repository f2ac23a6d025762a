//! Redacted user records
//!
//! The only way to build a [`UserRecord`] is [`UserRecord::redact`], so a
//! value of this type never carries the internal identifier or the password
//! hash. The user cache stores nothing else.

use serde::Serialize;
use serde_json::Value;

use super::store::{Document, ID_FIELD, INTERNAL_ID_FIELD, PASSWORD_HASH_FIELD};

/// Fields stripped from every user document before caching or returning it.
pub const REDACTED_FIELDS: [&str; 2] = [INTERNAL_ID_FIELD, PASSWORD_HASH_FIELD];

/// A user document with sensitive fields removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct UserRecord(Document);

impl UserRecord {
    /// Strips the redacted fields from a raw store document.
    pub fn redact(mut doc: Document) -> Self {
        for field in REDACTED_FIELDS {
            doc.remove(field);
        }
        Self(doc)
    }

    /// The user's `id` field, if it is a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get(ID_FIELD).and_then(Value::as_str)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn as_document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }
}
