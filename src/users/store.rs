//! Document Store Module
//!
//! The seam between the lookup layer and the user collection. Production code
//! plugs a database client in behind [`DocumentStore`]; [`MemoryDocumentStore`]
//! serves the binary and the tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::debug;

/// A raw document as stored in the user collection.
pub type Document = Map<String, Value>;

/// Field every user document is addressed by.
pub const ID_FIELD: &str = "id";
/// Store-internal identifier; never leaves the lookup layer.
pub const INTERNAL_ID_FIELD: &str = "_id";
/// Credential field; never enters the cache.
pub const PASSWORD_HASH_FIELD: &str = "password_hash";

// == Store Error ==
/// Failures reported by the backing document store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The store did not answer in time
    #[error("store query timed out")]
    Timeout,

    /// The store rejected the query
    #[error("query failed: {0}")]
    Query(String),
}

// == Filter ==
/// Query filters understood by the lookup layer, both keyed on `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `{ "id": <id> }`
    IdEq(String),
    /// `{ "id": { "$in": [<ids>] } }`
    IdIn(Vec<String>),
}

impl Filter {
    /// Returns true if `doc` satisfies the filter.
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(id) = doc.get(ID_FIELD).and_then(Value::as_str) else {
            return false;
        };
        match self {
            Filter::IdEq(wanted) => id == wanted,
            Filter::IdIn(wanted) => wanted.iter().any(|w| w == id),
        }
    }
}

// == Projection ==
/// Fields excluded server-side from query results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    pub exclude: Vec<String>,
}

impl Projection {
    /// Excludes the internal identifier and the password hash.
    pub fn redacted() -> Self {
        Self {
            exclude: vec![
                INTERNAL_ID_FIELD.to_string(),
                PASSWORD_HASH_FIELD.to_string(),
            ],
        }
    }

    /// Removes the excluded fields from `doc`.
    pub fn apply(&self, mut doc: Document) -> Document {
        for field in &self.exclude {
            doc.remove(field);
        }
        doc
    }
}

// == Document Store Trait ==
/// Operations the lookup layer needs from the user collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the first document matching `filter`, if any.
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError>;

    /// Returns every document matching `filter` with `projection` applied.
    async fn find(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<Document>, StoreError>;

    /// Merges `fields` into the document with the given id.
    ///
    /// Returns false if no such document exists.
    async fn update_one(&self, id: &str, fields: Document) -> Result<bool, StoreError>;
}

// == Memory Document Store ==
/// In-process user collection keyed by `id`.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from a JSON array of user documents.
    ///
    /// Every document must be an object with a string `id`.
    pub fn from_json(raw: &str) -> Result<Self, StoreError> {
        let docs: Vec<Document> =
            serde_json::from_str(raw).map_err(|e| StoreError::Query(e.to_string()))?;

        let mut documents = HashMap::with_capacity(docs.len());
        for doc in docs {
            let id = doc
                .get(ID_FIELD)
                .and_then(Value::as_str)
                .ok_or_else(|| StoreError::Query("user document without string id".into()))?
                .to_string();
            documents.insert(id, doc);
        }

        Ok(Self {
            documents: RwLock::new(documents),
        })
    }

    /// Inserts or replaces a document. Documents without a string `id` are
    /// rejected.
    pub async fn insert(&self, doc: Document) -> Result<(), StoreError> {
        let id = doc
            .get(ID_FIELD)
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::Query("user document without string id".into()))?
            .to_string();
        self.documents.write().await.insert(id, doc);
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }

    /// Ids of every stored document, in no particular order.
    pub async fn ids(&self) -> Vec<String> {
        self.documents.read().await.keys().cloned().collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let documents = self.documents.read().await;
        let found = match filter {
            Filter::IdEq(id) => documents.get(id).cloned(),
            Filter::IdIn(_) => documents.values().find(|doc| filter.matches(doc)).cloned(),
        };
        Ok(found)
    }

    async fn find(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<Document>, StoreError> {
        let documents = self.documents.read().await;
        let results: Vec<Document> = match filter {
            Filter::IdEq(id) => documents.get(id).cloned().into_iter().collect(),
            Filter::IdIn(ids) => {
                let unique: HashSet<&String> = ids.iter().collect();
                unique
                    .into_iter()
                    .filter_map(|id| documents.get(id).cloned())
                    .collect()
            }
        };

        debug!(matched = results.len(), "memory store find");
        Ok(results.into_iter().map(|doc| projection.apply(doc)).collect())
    }

    async fn update_one(&self, id: &str, fields: Document) -> Result<bool, StoreError> {
        let mut documents = self.documents.write().await;
        match documents.get_mut(id) {
            Some(doc) => {
                doc.extend(fields);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
