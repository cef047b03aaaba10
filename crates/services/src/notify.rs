use async_trait::async_trait;
use taskboard_db::models::{Board, User};
use tracing::info;

/// A push message addressed to one device token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub token: String,
    pub title: String,
    pub message: String,
}

impl Notification {
    /// Tells `member` they were added to `board`, naming whoever added them if known.
    pub fn board_assignment(board: &Board, member: &User, assigned_by: Option<&User>) -> Self {
        let message = match assigned_by {
            Some(by) => format!("You have been assigned to a new board by {}", by.name),
            None => "You have been assigned to a new board".to_string(),
        };
        Self {
            token: member.fcm_token.clone(),
            title: format!("Assigned to the board {}", board.name),
            message,
        }
    }
}

/// Delivery of push notifications. Only called after a board change has been saved.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, notification: Notification) -> anyhow::Result<()>;
}

/// Writes notifications to the log instead of delivering them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: Notification) -> anyhow::Result<()> {
        info!(
            title = %notification.title,
            message = %notification.message,
            has_token = !notification.token.is_empty(),
            "Notification"
        );
        Ok(())
    }
}
