//! In-memory board mutations.
//!
//! Everything here is pure: functions take a [`Board`](taskboard_db::models::Board)
//! and hand back the updated one. Persisting the result is the sync layer's job.

pub mod cards;
pub mod lists;
pub mod members;
pub mod rows;

use thiserror::Error;

pub use cards::{add_card, replace_cards};
pub use lists::{create_task_list, delete_task_list, rename_task_list};
pub use members::{assign_member_to_board, project_card_members, resolve_assigned_members};
pub use rows::{ListRow, append_add_list, ensure_persistable, strip_add_list};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("Position {position} is out of range ({len} entries)")]
    IndexOutOfRange { position: usize, len: usize },
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

pub type BoardResult<T> = Result<T, BoardError>;

pub(crate) fn check_position(position: usize, len: usize) -> BoardResult<()> {
    if position < len {
        Ok(())
    } else {
        Err(BoardError::IndexOutOfRange { position, len })
    }
}
