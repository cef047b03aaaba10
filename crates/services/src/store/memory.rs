use async_trait::async_trait;
use bson::{Bson, Document};
use dashmap::DashMap;
use tracing::debug;

use super::{DocumentStore, StoreError, StoreResult, StoredDocument, new_document_id};

/// Process-local store with the same semantics as [`super::MongoStore`].
///
/// Documents keep insertion order within a collection, so queries return them
/// in the order they were first written.
#[derive(Default)]
pub struct MemoryStore {
    collections: DashMap<String, Vec<StoredDocument>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents currently held in `collection`.
    pub fn len(&self, collection: &str) -> usize {
        self.collections.get(collection).map_or(0, |docs| docs.len())
    }

    pub fn is_empty(&self, collection: &str) -> bool {
        self.len(collection) == 0
    }

    fn query<F>(&self, collection: &str, predicate: F) -> Vec<StoredDocument>
    where
        F: Fn(&Document) -> bool,
    {
        self.collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| predicate(&doc.fields))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn merge_fields(target: &mut Document, source: Document) {
    for (key, value) in source {
        target.insert(key, value);
    }
}

fn not_found(collection: &str, id: &str) -> StoreError {
    StoreError::NotFound {
        collection: collection.to_string(),
        id: id.to_string(),
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<StoredDocument> {
        self.collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id).cloned())
            .ok_or_else(|| not_found(collection, id))
    }

    async fn set_document(
        &self,
        collection: &str,
        id: Option<&str>,
        mut value: Document,
        merge_if_exists: bool,
    ) -> StoreResult<String> {
        let id = id.map(str::to_string).unwrap_or_else(new_document_id);
        value.remove("_id");

        let mut docs = self.collections.entry(collection.to_string()).or_default();
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) if merge_if_exists => merge_fields(&mut existing.fields, value),
            Some(existing) => existing.fields = value,
            None => docs.push(StoredDocument {
                id: id.clone(),
                fields: value,
            }),
        }

        debug!(collection, %id, merge_if_exists, "Set document");
        Ok(id)
    }

    async fn update_fields(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()> {
        let mut docs = self
            .collections
            .get_mut(collection)
            .ok_or_else(|| not_found(collection, id))?;
        let existing = docs
            .iter_mut()
            .find(|doc| doc.id == id)
            .ok_or_else(|| not_found(collection, id))?;
        merge_fields(&mut existing.fields, fields);

        debug!(collection, %id, "Updated document fields");
        Ok(())
    }

    async fn query_by_field_contains(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>> {
        Ok(self.query(collection, |doc| match doc.get(field) {
            Some(Bson::Array(items)) => items.contains(&value),
            _ => false,
        }))
    }

    async fn query_by_field_equals(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>> {
        Ok(self.query(collection, |doc| doc.get(field) == Some(&value)))
    }

    async fn query_by_field_in(
        &self,
        collection: &str,
        field: &str,
        values: Vec<Bson>,
    ) -> StoreResult<Vec<StoredDocument>> {
        Ok(self.query(collection, |doc| {
            doc.get(field).is_some_and(|found| values.contains(found))
        }))
    }
}
