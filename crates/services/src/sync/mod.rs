//! Saving board changes and reloading the result.
//!
//! Each open board gets a [`BoardSession`]: a handle to a worker task that owns
//! the in-memory board and runs one mutation cycle at a time, in the order they
//! were submitted. A cycle applies the change locally, writes the whole affected
//! field, then reloads the board document and its members from the store.

mod coordinator;
mod open_board;

use taskboard_db::models::{Card, User, UserId};
use thiserror::Error;
use tokio::sync::oneshot;

use crate::board::BoardError;

pub use coordinator::{BoardSession, SyncCoordinator};
pub use open_board::OpenBoard;

/// Where a session's worker currently is in a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Idle,
    Mutating,
    Persisting,
    Reloading,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    #[error(transparent)]
    Board(#[from] BoardError),
    #[error("Could not save the board: {0}")]
    StoreWriteFailed(String),
    #[error("Could not load the board: {0}")]
    StoreReadFailed(String),
    #[error("{0}")]
    NotFound(String),
    #[error("The board session is closed")]
    SessionClosed,
}

impl SyncError {
    /// Message fit for showing to the person who triggered the change.
    pub fn user_message(&self) -> String {
        match self {
            // Contract violations never get a message of their own
            SyncError::Board(_) => "Something went wrong. Please try again.".to_string(),
            SyncError::StoreWriteFailed(_) => {
                "Could not save your changes. Please try again.".to_string()
            }
            SyncError::StoreReadFailed(_) => {
                "Could not refresh the board. Please try again.".to_string()
            }
            SyncError::NotFound(what) => what.clone(),
            SyncError::SessionClosed => "This board is no longer open.".to_string(),
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::StoreWriteFailed(_) | SyncError::StoreReadFailed(_)
        )
    }
}

/// A structural change to an open board.
///
/// Positions refer to the board's task lists as persisted, i.e. without the
/// trailing add-list row.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardMutation {
    CreateTaskList {
        title: String,
        created_by: UserId,
    },
    RenameTaskList {
        position: usize,
        title: String,
    },
    DeleteTaskList {
        position: usize,
    },
    AddCard {
        task_list_position: usize,
        name: String,
        created_by: UserId,
    },
    ReplaceCards {
        task_list_position: usize,
        cards: Vec<Card>,
    },
    AssignMember {
        user: User,
    },
    AssignMemberByEmail {
        email: String,
    },
}

impl BoardMutation {
    pub fn kind(&self) -> &'static str {
        match self {
            BoardMutation::CreateTaskList { .. } => "create_task_list",
            BoardMutation::RenameTaskList { .. } => "rename_task_list",
            BoardMutation::DeleteTaskList { .. } => "delete_task_list",
            BoardMutation::AddCard { .. } => "add_card",
            BoardMutation::ReplaceCards { .. } => "replace_cards",
            BoardMutation::AssignMember { .. } => "assign_member",
            BoardMutation::AssignMemberByEmail { .. } => "assign_member_by_email",
        }
    }
}

type SyncOutcome = Result<OpenBoard, SyncError>;

/// What to run once a cycle finishes. Exactly one side fires.
pub struct Continuation {
    inner: ContinuationInner,
}

enum ContinuationInner {
    Callbacks {
        on_success: Box<dyn FnOnce(OpenBoard) + Send>,
        on_failure: Box<dyn FnOnce(SyncError) + Send>,
    },
    Reply(oneshot::Sender<SyncOutcome>),
}

impl Continuation {
    pub fn new<S, F>(on_success: S, on_failure: F) -> Self
    where
        S: FnOnce(OpenBoard) + Send + 'static,
        F: FnOnce(SyncError) + Send + 'static,
    {
        Self {
            inner: ContinuationInner::Callbacks {
                on_success: Box::new(on_success),
                on_failure: Box::new(on_failure),
            },
        }
    }

    /// Runs the cycle without telling anyone how it went.
    pub fn detached() -> Self {
        Self::new(|_| {}, |_| {})
    }

    pub(crate) fn reply() -> (Self, oneshot::Receiver<SyncOutcome>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                inner: ContinuationInner::Reply(tx),
            },
            rx,
        )
    }

    pub(crate) fn finish(self, outcome: SyncOutcome) {
        match self.inner {
            ContinuationInner::Callbacks {
                on_success,
                on_failure,
            } => match outcome {
                Ok(board) => on_success(board),
                Err(err) => on_failure(err),
            },
            ContinuationInner::Reply(tx) => {
                // The caller may have stopped waiting; the cycle still ran
                let _ = tx.send(outcome);
            }
        }
    }
}
