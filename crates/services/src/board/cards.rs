use taskboard_db::models::{Board, Card, UserId};

use super::{BoardResult, check_position};

/// Appends a card to the list at `task_list_position`, assigned to its creator.
pub fn add_card(
    mut board: Board,
    task_list_position: usize,
    name: String,
    created_by: UserId,
) -> BoardResult<Board> {
    check_position(task_list_position, board.task_list.len())?;
    board.task_list[task_list_position]
        .cards
        .push(Card::new(name, created_by));
    Ok(board)
}

/// Swaps in a whole new card sequence, e.g. after editing a card's details or members.
pub fn replace_cards(
    mut board: Board,
    task_list_position: usize,
    cards: Vec<Card>,
) -> BoardResult<Board> {
    check_position(task_list_position, board.task_list.len())?;
    board.task_list[task_list_position].cards = cards;
    Ok(board)
}
