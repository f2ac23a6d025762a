//! Instrumented document stores for lookup tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use super::store::{Document, DocumentStore, Filter, MemoryDocumentStore, Projection, StoreError};

pub(crate) const SEED_USERS: &str = r#"[
    {"_id": "oid-1", "id": "u1", "name": "Ada", "email": "ada@zion.city", "password_hash": "$2b$12$one"},
    {"_id": "oid-2", "id": "u2", "name": "Grace", "email": "grace@zion.city", "password_hash": "$2b$12$two"},
    {"_id": "oid-3", "id": "u3", "name": "Linus", "email": "linus@zion.city", "password_hash": "$2b$12$three"}
]"#;

/// Wraps a [`MemoryDocumentStore`] and records every read it serves.
pub(crate) struct CountingStore {
    inner: MemoryDocumentStore,
    find_one_calls: AtomicUsize,
    find_calls: AtomicUsize,
    last_batch: Mutex<Vec<String>>,
    failure: Mutex<Option<StoreError>>,
    ignore_projection: bool,
}

impl CountingStore {
    pub(crate) fn seeded() -> Self {
        Self {
            inner: MemoryDocumentStore::from_json(SEED_USERS).unwrap(),
            find_one_calls: AtomicUsize::new(0),
            find_calls: AtomicUsize::new(0),
            last_batch: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
            ignore_projection: false,
        }
    }

    /// Returns raw documents from `find`, as a misbehaving store would.
    pub(crate) fn ignoring_projection(mut self) -> Self {
        self.ignore_projection = true;
        self
    }

    /// Makes every subsequent read fail with `err`.
    pub(crate) fn fail_with(&self, err: StoreError) {
        *self.failure.lock() = Some(err);
    }

    pub(crate) fn inner(&self) -> &MemoryDocumentStore {
        &self.inner
    }

    pub(crate) fn find_one_calls(&self) -> usize {
        self.find_one_calls.load(Ordering::SeqCst)
    }

    pub(crate) fn find_calls(&self) -> usize {
        self.find_calls.load(Ordering::SeqCst)
    }

    /// Ids requested by the most recent `find`.
    pub(crate) fn last_batch(&self) -> Vec<String> {
        self.last_batch.lock().clone()
    }

    fn check_failure(&self) -> Result<(), StoreError> {
        match self.failure.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for CountingStore {
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        self.find_one_calls.fetch_add(1, Ordering::SeqCst);
        self.check_failure()?;
        self.inner.find_one(filter).await
    }

    async fn find(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<Document>, StoreError> {
        self.find_calls.fetch_add(1, Ordering::SeqCst);
        if let Filter::IdIn(ids) = filter {
            *self.last_batch.lock() = ids.clone();
        }
        self.check_failure()?;

        if self.ignore_projection {
            self.inner.find(filter, &Projection::default()).await
        } else {
            self.inner.find(filter, projection).await
        }
    }

    async fn update_one(&self, id: &str, fields: Document) -> Result<bool, StoreError> {
        self.inner.update_one(id, fields).await
    }
}

/// Serves reads from a [`MemoryDocumentStore`] but holds each read after it
/// has loaded its documents until [`GatedStore::open`] is called.
pub(crate) struct GatedStore {
    inner: MemoryDocumentStore,
    gated: AtomicBool,
    entered: Notify,
    gate: Notify,
}

impl GatedStore {
    pub(crate) fn seeded() -> Self {
        Self {
            inner: MemoryDocumentStore::from_json(SEED_USERS).unwrap(),
            gated: AtomicBool::new(true),
            entered: Notify::new(),
            gate: Notify::new(),
        }
    }

    /// Resolves once a read has loaded its documents and is waiting.
    pub(crate) async fn wait_until_entered(&self) {
        self.entered.notified().await;
    }

    /// Releases the waiting read and lets later reads through.
    pub(crate) fn open(&self) {
        self.gated.store(false, Ordering::SeqCst);
        self.gate.notify_one();
    }

    async fn hold(&self) {
        if self.gated.load(Ordering::SeqCst) {
            self.entered.notify_one();
            self.gate.notified().await;
        }
    }
}

#[async_trait]
impl DocumentStore for GatedStore {
    async fn find_one(&self, filter: &Filter) -> Result<Option<Document>, StoreError> {
        let doc = self.inner.find_one(filter).await?;
        self.hold().await;
        Ok(doc)
    }

    async fn find(
        &self,
        filter: &Filter,
        projection: &Projection,
    ) -> Result<Vec<Document>, StoreError> {
        let docs = self.inner.find(filter, projection).await?;
        self.hold().await;
        Ok(docs)
    }

    async fn update_one(&self, id: &str, fields: Document) -> Result<bool, StoreError> {
        self.inner.update_one(id, fields).await
    }
}
