use std::marker::PhantomData;
use std::sync::Arc;

use bson::{Bson, Document};
use serde::{Serialize, de::DeserializeOwned};
use taskboard_db::fields;
use taskboard_db::models::{Board, User};
use thiserror::Error;
use tracing::debug;

use crate::store::{DocumentStore, StoreError, StoredDocument};

#[derive(Debug, Error)]
pub enum DaoError {
    #[error("Store error: {0}")]
    Store(StoreError),
    #[error("BSON serialization error: {0}")]
    BsonSer(#[from] bson::ser::Error),
    #[error("BSON deserialization error: {0}")]
    BsonDe(#[from] bson::de::Error),
    #[error("{0} not found")]
    NotFound(String),
    #[error("No user is signed in")]
    Unauthenticated,
}

impl From<StoreError> for DaoError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => {
                DaoError::NotFound(format!("{collection}/{id}"))
            }
            other => DaoError::Store(other),
        }
    }
}

pub type DaoResult<T> = Result<T, DaoError>;

/// A model persisted as one document in its own collection.
pub trait StoredModel: Serialize + DeserializeOwned + Send + Sync {
    const COLLECTION: &'static str;

    /// Receives the id of the document the model was read from.
    fn attach_id(&mut self, _id: String) {}
}

impl StoredModel for Board {
    const COLLECTION: &'static str = fields::BOARDS;

    fn attach_id(&mut self, id: String) {
        self.document_id = id;
    }
}

impl StoredModel for User {
    const COLLECTION: &'static str = fields::USERS;
}

pub struct BaseDao<T: StoredModel> {
    store: Arc<dyn DocumentStore>,
    _model: PhantomData<fn() -> T>,
}

impl<T: StoredModel> BaseDao<T> {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            _model: PhantomData,
        }
    }

    pub async fn find_by_id(&self, id: &str) -> DaoResult<T> {
        let stored = self.store.get_document(T::COLLECTION, id).await?;
        decode(stored)
    }

    pub async fn find_containing(&self, field: &str, value: impl Into<Bson>) -> DaoResult<Vec<T>> {
        let docs = self
            .store
            .query_by_field_contains(T::COLLECTION, field, value.into())
            .await?;
        docs.into_iter().map(decode).collect()
    }

    pub async fn find_equal(&self, field: &str, value: impl Into<Bson>) -> DaoResult<Vec<T>> {
        let docs = self
            .store
            .query_by_field_equals(T::COLLECTION, field, value.into())
            .await?;
        docs.into_iter().map(decode).collect()
    }

    pub async fn find_in(&self, field: &str, values: Vec<Bson>) -> DaoResult<Vec<T>> {
        let docs = self
            .store
            .query_by_field_in(T::COLLECTION, field, values)
            .await?;
        docs.into_iter().map(decode).collect()
    }

    /// Writes `model` merged over any existing document and returns its id.
    pub async fn upsert(&self, id: Option<&str>, model: &T) -> DaoResult<String> {
        let value = bson::to_document(model)?;
        let id = self
            .store
            .set_document(T::COLLECTION, id, value, true)
            .await?;
        debug!(collection = T::COLLECTION, %id, "Upserted document");
        Ok(id)
    }

    pub async fn update_fields(&self, id: &str, fields: Document) -> DaoResult<()> {
        self.store.update_fields(T::COLLECTION, id, fields).await?;
        Ok(())
    }
}

fn decode<T: StoredModel>(stored: StoredDocument) -> DaoResult<T> {
    let mut model: T = bson::from_document(stored.fields)?;
    model.attach_id(stored.id);
    Ok(model)
}
