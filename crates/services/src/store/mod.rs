//! Remote document persistence.
//!
//! Every backend speaks the same six operations over field maps (`bson::Document`)
//! addressed by collection name and string id. Nothing above this layer knows
//! which backend it is talking to.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use bson::{Bson, Document};
use thiserror::Error;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("Document {collection}/{id} not found")]
    NotFound { collection: String, id: String },
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A document as handed back by a store: its id plus its fields.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub fields: Document,
}

#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<StoredDocument>;

    /// Writes `value` under `id`, or under a store-assigned id when `id` is `None`.
    ///
    /// With `merge_if_exists` the top-level fields of `value` are laid over an
    /// existing document; otherwise the document is replaced.
    async fn set_document(
        &self,
        collection: &str,
        id: Option<&str>,
        value: Document,
        merge_if_exists: bool,
    ) -> StoreResult<String>;

    /// Overwrites the given top-level fields of an existing document.
    async fn update_fields(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()>;

    /// Documents whose array field `field` has `value` as an element.
    async fn query_by_field_contains(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>>;

    async fn query_by_field_equals(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>>;

    async fn query_by_field_in(
        &self,
        collection: &str,
        field: &str,
        values: Vec<Bson>,
    ) -> StoreResult<Vec<StoredDocument>>;
}

pub(crate) fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
