use async_trait::async_trait;
use bson::{Bson, Document, doc};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use tracing::debug;

use super::{DocumentStore, StoreError, StoreResult, StoredDocument, new_document_id};

/// MongoDB-backed store. Document ids live in `_id` as plain strings.
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }

    async fn find_many(&self, collection: &str, filter: Document) -> StoreResult<Vec<StoredDocument>> {
        let mut cursor = self.collection(collection).find(filter).await?;

        let mut results = Vec::new();
        while let Some(doc) = cursor.try_next().await? {
            if let Some(stored) = into_stored(doc) {
                results.push(stored);
            }
        }
        Ok(results)
    }
}

fn by_id(id: &str) -> Document {
    doc! { "_id": id }
}

fn field_filter(field: &str, value: impl Into<Bson>) -> Document {
    let mut filter = Document::new();
    filter.insert(field, value);
    filter
}

fn into_stored(mut doc: Document) -> Option<StoredDocument> {
    match doc.remove("_id") {
        Some(Bson::String(id)) => Some(StoredDocument { id, fields: doc }),
        Some(Bson::ObjectId(oid)) => Some(StoredDocument {
            id: oid.to_hex(),
            fields: doc,
        }),
        _ => None,
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get_document(&self, collection: &str, id: &str) -> StoreResult<StoredDocument> {
        self.collection(collection)
            .find_one(by_id(id))
            .await?
            .and_then(into_stored)
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })
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

        if merge_if_exists {
            self.collection(collection)
                .update_one(by_id(&id), doc! { "$set": value })
                .upsert(true)
                .await?;
        } else {
            self.collection(collection)
                .replace_one(by_id(&id), value)
                .upsert(true)
                .await?;
        }

        debug!(collection, %id, merge_if_exists, "Set document");
        Ok(id)
    }

    async fn update_fields(&self, collection: &str, id: &str, fields: Document) -> StoreResult<()> {
        let result = self
            .collection(collection)
            .update_one(by_id(id), doc! { "$set": fields })
            .await?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }

        debug!(collection, %id, "Updated document fields");
        Ok(())
    }

    async fn query_by_field_contains(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>> {
        // $elemMatch keeps scalar fields equal to `value` out of the result
        self.find_many(collection, field_filter(field, doc! { "$elemMatch": { "$eq": value } }))
            .await
    }

    async fn query_by_field_equals(
        &self,
        collection: &str,
        field: &str,
        value: Bson,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.find_many(collection, field_filter(field, value)).await
    }

    async fn query_by_field_in(
        &self,
        collection: &str,
        field: &str,
        values: Vec<Bson>,
    ) -> StoreResult<Vec<StoredDocument>> {
        self.find_many(collection, field_filter(field, doc! { "$in": values }))
            .await
    }
}
