use taskboard_db::fields;
use taskboard_services::{BoardMutation, SyncError, SyncState};

use crate::fixtures::TestApp;

#[tokio::test]
async fn assigning_a_member_writes_assigned_to_and_notifies_them() {
    let app = TestApp::new();
    let seeded = app.seed_board("u1", "Sprint").await;
    let helper = app.register_user("u2", "Bo").await;
    let session = app.open(&seeded.board_id).await;

    let open = session
        .apply(BoardMutation::AssignMemberByEmail {
            email: "u2@example.com".into(),
        })
        .await
        .unwrap();

    assert_eq!(open.board().assigned_to, vec!["u1".to_string(), "u2".to_string()]);
    let member_ids: Vec<&str> = open.members().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(member_ids, vec!["u1", "u2"]);

    let updates = app.store.updates();
    assert_eq!(updates.len(), 1);
    assert!(updates[0].fields.contains_key(fields::ASSIGNED_TO));

    let sent = app.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].token, helper.user.fcm_token);
    assert_eq!(sent[0].title, "Assigned to the board Sprint");
    assert_eq!(
        sent[0].message,
        "You have been assigned to a new board by Owner u1"
    );
}

#[tokio::test]
async fn assigning_an_existing_member_changes_nothing() {
    let app = TestApp::new();
    let seeded = app.seed_board("u1", "Sprint").await;
    let helper = app.register_user("u2", "Bo").await;
    let session = app.open(&seeded.board_id).await;

    for _ in 0..2 {
        session
            .apply(BoardMutation::AssignMember {
                user: helper.user.clone(),
            })
            .await
            .unwrap();
    }

    let open = session.snapshot();
    assert_eq!(open.board().assigned_to, vec!["u1".to_string(), "u2".to_string()]);
    assert_eq!(app.notifier.sent().len(), 1);

    let stored = app.store.fields(fields::BOARDS, &seeded.board_id).await;
    assert_eq!(stored.get_array(fields::ASSIGNED_TO).unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_email_is_reported_without_writing() {
    let app = TestApp::new();
    let seeded = app.seed_board("u1", "Sprint").await;
    let session = app.open(&seeded.board_id).await;

    let err = session
        .apply(BoardMutation::AssignMemberByEmail {
            email: "nobody@example.com".into(),
        })
        .await
        .unwrap_err();

    assert_eq!(err, SyncError::NotFound("No such member found".into()));
    assert_eq!(err.user_message(), "No such member found");
    assert!(app.store.updates().is_empty());
    assert!(app.notifier.sent().is_empty());
    assert_eq!(session.state(), SyncState::Idle);
}

#[tokio::test]
async fn assigned_board_shows_up_for_the_new_member() {
    let app = TestApp::new();
    let seeded = app.seed_board("u1", "Sprint").await;
    app.register_user("u2", "Bo").await;
    assert!(app.services.boards.list_for_current_user().await.unwrap().is_empty());

    let session = app.open(&seeded.board_id).await;
    session
        .apply(BoardMutation::AssignMemberByEmail {
            email: "u2@example.com".into(),
        })
        .await
        .unwrap();

    let boards = app.services.boards.list_for_current_user().await.unwrap();
    assert_eq!(boards.len(), 1);
    assert_eq!(boards[0].document_id, seeded.board_id);
}

#[tokio::test]
async fn members_without_a_user_record_are_left_out() {
    let app = TestApp::new();
    let seeded = app.seed_board("u1", "Sprint").await;

    app.services
        .boards
        .update_assigned_to(&seeded.board_id, &["u1".to_string(), "ghost".to_string()])
        .await
        .unwrap();

    let session = app.open(&seeded.board_id).await;
    let open = session.snapshot();
    assert_eq!(open.board().assigned_to.len(), 2);
    let member_ids: Vec<&str> = open.members().iter().map(|m| m.id.as_str()).collect();
    assert_eq!(member_ids, vec!["u1"]);
}
