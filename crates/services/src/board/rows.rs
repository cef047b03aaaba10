use taskboard_db::models::TaskList;

use super::{BoardError, BoardResult};

/// One column as displayed on an open board.
///
/// `AddList` is the trailing "add new list" affordance. It only exists in the
/// displayed sequence; persisted lists are plain `Vec<TaskList>`.
#[derive(Debug, Clone, PartialEq)]
pub enum ListRow {
    Real(TaskList),
    AddList,
}

impl ListRow {
    pub fn task_list(&self) -> Option<&TaskList> {
        match self {
            ListRow::Real(list) => Some(list),
            ListRow::AddList => None,
        }
    }

    pub fn is_add_list(&self) -> bool {
        matches!(self, ListRow::AddList)
    }
}

/// Display sequence for freshly loaded lists: every list, then one `AddList`.
pub fn append_add_list(lists: Vec<TaskList>) -> Vec<ListRow> {
    lists
        .into_iter()
        .map(ListRow::Real)
        .chain(std::iter::once(ListRow::AddList))
        .collect()
}

/// Fails if any row is an `AddList`.
pub fn ensure_persistable(rows: &[ListRow]) -> BoardResult<()> {
    match rows.iter().position(ListRow::is_add_list) {
        Some(position) => Err(BoardError::InvariantViolation(format!(
            "add-list row at position {position} cannot be persisted"
        ))),
        None => Ok(()),
    }
}

/// Drops the trailing `AddList`, if any, and returns the lists to persist.
///
/// An `AddList` anywhere but the tail means the display sequence was corrupted
/// and is rejected rather than silently dropped.
pub fn strip_add_list(mut rows: Vec<ListRow>) -> BoardResult<Vec<TaskList>> {
    if rows.last().is_some_and(ListRow::is_add_list) {
        rows.pop();
    }
    ensure_persistable(&rows)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| match row {
            ListRow::Real(list) => Some(list),
            ListRow::AddList => None,
        })
        .collect())
}
