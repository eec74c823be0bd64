//! Move serialization.

use crate::board::{Move, MoveKind};

/// Line sent when a phase produces no moves.
pub const NO_MOVES: &str = "No moves";

/// Formats a single move in server notation.
pub fn format_move(m: &Move) -> String {
    if let Some(reason) = &m.illegal {
        return format!("{} illegal_move {}", m.player, reason);
    }
    match m.kind {
        MoveKind::PlaceArmies { region, armies } => {
            format!("{} place_armies {} {}", m.player, region, armies)
        }
        MoveKind::AttackTransfer { from, to, armies } => {
            format!("{} attack/transfer {} {} {}", m.player, from, to, armies)
        }
    }
}

/// Formats a phase's moves as one comma-joined line.
pub fn format_moves(moves: &[Move]) -> String {
    if moves.is_empty() {
        return NO_MOVES.to_string();
    }
    moves.iter().map(format_move).collect::<Vec<_>>().join(",")
}
