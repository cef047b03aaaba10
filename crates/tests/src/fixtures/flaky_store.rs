use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bson::{Bson, Document};
use parking_lot::Mutex;
use taskboard_services::store::{DocumentStore, MemoryStore, StoreError, StoreResult, StoredDocument};
use tokio::sync::Semaphore;

/// One `update_fields` call as the store received it.
#[derive(Debug, Clone)]
pub struct RecordedUpdate {
    pub collection: String,
    pub id: String,
    pub fields: Document,
}

/// In-memory store that can fail or hold back individual calls.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_next_get: AtomicBool,
    fail_next_update: AtomicBool,
    update_gate: Mutex<Option<Arc<Semaphore>>>,
    updates: Mutex<Vec<RecordedUpdate>>,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }

    /// The next `get_document` fails with `Unavailable`.
    pub fn fail_next_get(&self) {
        self.fail_next_get.store(true, Ordering::SeqCst);
    }

    /// The next `update_fields` fails with `Unavailable` without touching the data.
    pub fn fail_next_update(&self) {
        self.fail_next_update.store(true, Ordering::SeqCst);
    }

    /// From now on every `update_fields` waits for a permit on the returned gate.
    pub fn hold_updates(&self) -> Arc<Semaphore> {
        let gate = Arc::new(Semaphore::new(0));
        *self.update_gate.lock() = Some(Arc::clone(&gate));
        gate
    }

    /// Every `update_fields` call seen so far, failed ones included.
    pub fn updates(&self) -> Vec<RecordedUpdate> {
        self.updates.lock().clone()
    }

    /// Current stored fields of one document.
    pub async fn fields(&self, collection: &str, id: &str) -> Document {
        self.inner
            .get_document(collection, id)
            .await
            .map(|doc| doc.fields)
            .unwrap_or_default()
    }
}

fn injected(operation: &str) -> StoreError {
    StoreError::Unavailable(format!("injected {operation} failure"))
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<StoredDocument> {
        if self.fail_next_get.swap(false, Ordering::SeqCst) {
            return Err(injected("get"));
        }
        self.inner.get_document(collection, id).await
    }

    async fn set_document(
        &self,
        collection: &str,
        id: Option<&str>,
        value: Document,
        merge_if_exists: bool,
    ) -> StoreResult<String> {
        self.inner
            .set_document(collection, id, value, merge_if_exists)
            .await
    }

    async fn update_fields(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()> {
        self.updates.lock().push(RecordedUpdate {
            collection: collection.to_string(),
            id: id.to_string(),
            fields: fields.clone(),
        });

        let gate = self.update_gate.lock().clone();
        if let Some(gate) = gate {
            gate.acquire()
                .await
                .map_err(|_| injected("gated update"))?
                .forget();
        }

        if self.fail_next_update.swap(false, Ordering::SeqCst) {
            return Err(injected("update"));
        }
        self.inner.update_fields(collection, id, fields).await
    }

    async fn query_by_field_contains(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.inner.query_by_field_contains(collection, field, value).await
    }

    async fn query_by_field_equals(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.inner.query_by_field_equals(collection, field, value).await
    }

    async fn query_by_field_in(
        &self,
        collection: &str,
        field: &str,
        values: Vec<Bson>,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.inner.query_by_field_in(collection, field, values).await
    }
}
