use taskboard_db::models::{Board, SelectedMembers, User};

use crate::board::{BoardResult, ListRow, append_add_list, project_card_members, strip_add_list};

/// The in-memory state of an open board: the document, its display rows and
/// its resolved members.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenBoard {
    board: Board,
    rows: Vec<ListRow>,
    members: Vec<User>,
}

impl OpenBoard {
    /// State straight after a load: display rows end with the add-list row.
    pub(crate) fn loaded(board: Board, members: Vec<User>) -> Self {
        let rows = append_add_list(board.task_list.clone());
        Self {
            board,
            rows,
            members,
        }
    }

    /// State after a local change that has not been reloaded yet.
    pub(crate) fn locally_mutated(board: Board, members: Vec<User>) -> Self {
        let rows = board.task_list.iter().cloned().map(ListRow::Real).collect();
        Self {
            board,
            rows,
            members,
        }
    }

    /// Copy of the board whose task lists come from the display rows, ready to mutate.
    pub(crate) fn editable_board(&self) -> BoardResult<Board> {
        let task_list = strip_add_list(self.rows.clone())?;
        Ok(Board {
            task_list,
            ..self.board.clone()
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn document_id(&self) -> &str {
        &self.board.document_id
    }

    pub fn rows(&self) -> &[ListRow] {
        &self.rows
    }

    pub fn members(&self) -> &[User] {
        &self.members
    }

    /// Member avatars for one card, or `None` if there is no such card.
    pub fn card_members(
        &self,
        task_list_position: usize,
        card_position: usize,
    ) -> Option<Vec<SelectedMembers>> {
        let card = self
            .board
            .task_list
            .get(task_list_position)?
            .cards
            .get(card_position)?;
        Some(project_card_members(card, &self.members))
    }
}
