use mongodb::{Database, IndexModel, options::IndexOptions};
use tracing::info;

use crate::fields;

pub async fn ensure_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    // Users: looked up by id when resolving board members, by email when inviting
    create_indexes(
        db,
        fields::USERS,
        vec![
            index_unique(bson::doc! { "id": 1 }),
            index(bson::doc! { "email": 1 }),
        ],
    )
    .await?;

    // Boards: listed per member
    create_indexes(
        db,
        fields::BOARDS,
        vec![index(bson::doc! { "assignedTo": 1 })],
    )
    .await?;

    info!("All indexes ensured");
    Ok(())
}

fn index(keys: bson::Document) -> IndexModel {
    IndexModel::builder().keys(keys).build()
}

fn index_unique(keys: bson::Document) -> IndexModel {
    IndexModel::builder()
        .keys(keys)
        .options(IndexOptions::builder().unique(true).build())
        .build()
}

async fn create_indexes(
    db: &Database,
    collection: &str,
    indexes: Vec<IndexModel>,
) -> Result<(), mongodb::error::Error> {
    db.collection::<bson::Document>(collection)
        .create_indexes(indexes)
        .await?;
    info!(collection, "Indexes created");
    Ok(())
}
