use taskboard_db::models::{Board, Card, SelectedMembers, User, UserId};

/// Adds `user` to the board's members. Returns `false` if they already were one.
pub fn assign_member_to_board(board: &mut Board, user: &User) -> bool {
    if board.is_assigned(&user.id) {
        return false;
    }
    board.assigned_to.push(user.id.clone());
    true
}

/// Users from `directory` that are assigned to the board, in directory order.
///
/// Assigned ids without a user record are dropped.
pub fn resolve_assigned_members(assigned_to: &[UserId], directory: Vec<User>) -> Vec<User> {
    directory
        .into_iter()
        .filter(|user| assigned_to.contains(&user.id))
        .collect()
}

/// Avatars to show on a card, in board-member order.
///
/// Empty when nobody but the card's creator is on it, since the strip would
/// only repeat the creator.
pub fn project_card_members(card: &Card, resolved: &[User]) -> Vec<SelectedMembers> {
    let selected: Vec<SelectedMembers> = resolved
        .iter()
        .filter(|user| card.assigned_to.contains(&user.id))
        .map(SelectedMembers::from)
        .collect();

    if let [only] = selected.as_slice()
        && only.id == card.created_by
    {
        return Vec::new();
    }
    selected
}
