use taskboard_db::models::{Board, TaskList, UserId};

use super::{BoardResult, check_position};

/// New lists go first.
pub fn create_task_list(mut board: Board, title: String, created_by: UserId) -> Board {
    board.task_list.insert(0, TaskList::new(title, created_by));
    board
}

/// Replaces the title of the list at `position`, keeping its cards and creator.
pub fn rename_task_list(mut board: Board, position: usize, title: String) -> BoardResult<Board> {
    check_position(position, board.task_list.len())?;
    board.task_list[position].title = title;
    Ok(board)
}

pub fn delete_task_list(mut board: Board, position: usize) -> BoardResult<Board> {
    check_position(position, board.task_list.len())?;
    board.task_list.remove(position);
    Ok(board)
}
