use std::fmt::Write;

use taskboard_services::OpenBoard;
use taskboard_services::board::ListRow;

/// Plain-text view of an open board, one list per block.
pub fn board(open: &OpenBoard) -> String {
    let mut out = String::new();
    let board = open.board();

    let _ = writeln!(out, "{} ({})", board.name, open.document_id());
    let names: Vec<&str> = open.members().iter().map(|m| m.name.as_str()).collect();
    let _ = writeln!(out, "members: {}", names.join(", "));

    for (position, row) in open.rows().iter().enumerate() {
        let list = match row {
            ListRow::Real(list) => list,
            ListRow::AddList => {
                let _ = writeln!(out, "[+] Add list");
                continue;
            }
        };

        let _ = writeln!(out, "[{position}] {}", list.title);
        for (card_position, card) in list.cards.iter().enumerate() {
            let label = if card.has_label() {
                format!(" {}", card.label_color)
            } else {
                String::new()
            };
            let members = open
                .card_members(position, card_position)
                .unwrap_or_default()
                .into_iter()
                .map(|member| member.id)
                .collect::<Vec<_>>();

            if members.is_empty() {
                let _ = writeln!(out, "    - {}{label}", card.name);
            } else {
                let _ = writeln!(out, "    - {}{label} @{}", card.name, members.join(" @"));
            }
        }
    }

    out
}
