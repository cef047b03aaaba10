//! `MongoStore` against a live server. Run with `cargo test -- --ignored` and
//! `TASKBOARD__DATABASE__URL` pointing at a MongoDB.

use bson::doc;
use taskboard_db::fields;
use taskboard_db::models::User;
use taskboard_services::board::ListRow;
use taskboard_services::store::{DocumentStore, StoreError, StoredDocument};
use taskboard_services::BoardMutation;

use crate::fixtures::MongoTestDb;

fn sorted_ids(docs: &[StoredDocument]) -> Vec<&str> {
    let mut ids: Vec<&str> = docs.iter().map(|doc| doc.id.as_str()).collect();
    ids.sort_unstable();
    ids
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn set_without_id_assigns_a_string_id() {
    let mongo = MongoTestDb::spawn().await;
    let store = mongo.store();

    let id = store
        .set_document(fields::BOARDS, None, doc! { "name": "A" }, true)
        .await
        .unwrap();
    assert!(!id.is_empty());

    let stored = store.get_document(fields::BOARDS, &id).await.unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.fields.get_str("name").unwrap(), "A");
    assert!(!stored.fields.contains_key("_id"));

    mongo.drop_database().await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn merge_keeps_untouched_fields_and_replace_drops_them() {
    let mongo = MongoTestDb::spawn().await;
    let store = mongo.store();

    store
        .set_document(
            fields::USERS,
            Some("u1"),
            doc! { "id": "u1", "name": "Ana", "mobile": 5_i64 },
            true,
        )
        .await
        .unwrap();

    store
        .set_document(fields::USERS, Some("u1"), doc! { "name": "Ana B" }, true)
        .await
        .unwrap();
    let merged = store.get_document(fields::USERS, "u1").await.unwrap();
    assert_eq!(merged.fields.get_str("name").unwrap(), "Ana B");
    assert_eq!(merged.fields.get_i64("mobile").unwrap(), 5);

    store
        .set_document(fields::USERS, Some("u1"), doc! { "id": "u1", "name": "Bo" }, false)
        .await
        .unwrap();
    let replaced = store.get_document(fields::USERS, "u1").await.unwrap();
    assert_eq!(replaced.fields.get_str("name").unwrap(), "Bo");
    assert!(replaced.fields.get("mobile").is_none());

    mongo.drop_database().await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn missing_documents_are_not_found() {
    let mongo = MongoTestDb::spawn().await;
    let store = mongo.store();

    let err = store.get_document(fields::BOARDS, "nope").await.unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));

    let err = store
        .update_fields(fields::BOARDS, "nope", doc! { "taskList": [] })
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));

    // update_fields never creates the document
    assert!(store.get_document(fields::BOARDS, "nope").await.is_err());

    mongo.drop_database().await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn update_fields_overwrites_only_the_given_fields() {
    let mongo = MongoTestDb::spawn().await;
    let store = mongo.store();

    store
        .set_document(
            fields::BOARDS,
            Some("b1"),
            doc! { "name": "Sprint", "taskList": [{ "title": "Old" }] },
            true,
        )
        .await
        .unwrap();
    store
        .update_fields(fields::BOARDS, "b1", doc! { "taskList": [{ "title": "To Do" }] })
        .await
        .unwrap();

    let stored = store.get_document(fields::BOARDS, "b1").await.unwrap();
    assert_eq!(stored.fields.get_str("name").unwrap(), "Sprint");
    let lists = stored.fields.get_array("taskList").unwrap();
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].as_document().unwrap().get_str("title").unwrap(), "To Do");

    mongo.drop_database().await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn contains_matches_array_elements_only() {
    let mongo = MongoTestDb::spawn().await;
    let store = mongo.store();

    store
        .set_document(fields::BOARDS, Some("b1"), doc! { "assignedTo": ["u1", "u2"] }, true)
        .await
        .unwrap();
    store
        .set_document(fields::BOARDS, Some("b2"), doc! { "assignedTo": ["u2"] }, true)
        .await
        .unwrap();
    store
        .set_document(fields::BOARDS, Some("b3"), doc! { "assignedTo": "u1" }, true)
        .await
        .unwrap();

    let found = store
        .query_by_field_contains(fields::BOARDS, fields::ASSIGNED_TO, "u1".into())
        .await
        .unwrap();
    assert_eq!(sorted_ids(&found), vec!["b1"]);

    let found = store
        .query_by_field_contains(fields::BOARDS, fields::ASSIGNED_TO, "u2".into())
        .await
        .unwrap();
    assert_eq!(sorted_ids(&found), vec!["b1", "b2"]);

    mongo.drop_database().await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn equals_and_in_queries() {
    let mongo = MongoTestDb::spawn().await;
    let store = mongo.store();

    for (id, email) in [("u1", "a@x.io"), ("u2", "b@x.io"), ("u3", "c@x.io")] {
        store
            .set_document(fields::USERS, Some(id), doc! { "id": id, "email": email }, true)
            .await
            .unwrap();
    }

    let by_email = store
        .query_by_field_equals(fields::USERS, fields::EMAIL, "b@x.io".into())
        .await
        .unwrap();
    assert_eq!(sorted_ids(&by_email), vec!["u2"]);

    let by_ids = store
        .query_by_field_in(fields::USERS, fields::ID, vec!["u3".into(), "u1".into(), "ghost".into()])
        .await
        .unwrap();
    assert_eq!(sorted_ids(&by_ids), vec!["u1", "u3"]);

    let none = store
        .query_by_field_in(fields::USERS, fields::ID, Vec::new())
        .await
        .unwrap();
    assert!(none.is_empty());

    mongo.drop_database().await;
}

#[tokio::test]
#[ignore = "requires MongoDB"]
async fn board_changes_survive_a_fresh_session() {
    let mongo = MongoTestDb::spawn().await;
    let services = mongo.services("u1");

    services
        .users
        .register(User::new(String::new(), "Ana".into(), "ana@example.com".into()))
        .await
        .unwrap();
    let board = services
        .boards
        .create("Sprint".into(), String::new(), "Ana".into())
        .await
        .unwrap();

    let session = services.sync.open(&board.document_id).await.unwrap();
    session
        .apply(BoardMutation::CreateTaskList {
            title: "To Do".into(),
            created_by: "u1".into(),
        })
        .await
        .unwrap();
    drop(session);

    // A second client on the same database sees the saved list
    let other = mongo.services("u1");
    let reopened = other.sync.open(&board.document_id).await.unwrap().snapshot();
    assert_eq!(reopened.rows().len(), 2);
    assert_eq!(reopened.rows()[0].task_list().unwrap().title, "To Do");
    assert_eq!(reopened.rows()[1], ListRow::AddList);
    assert_eq!(reopened.members()[0].name, "Ana");

    let listed = other.boards.list_for_current_user().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].document_id, board.document_id);

    mongo.drop_database().await;
}
