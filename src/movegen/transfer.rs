//! Routing of idle interior armies toward the front.

use std::cmp::Reverse;

use tracing::trace;

use super::distance::DistanceMap;
use crate::board::{Board, Move, Region};
use crate::state::Players;

/// Returns true if the region can be stripped down to one army: it is ours,
/// holds spare armies, and no opponent region borders it.
pub fn is_safe_source(board: &Board, region: &Region, players: &Players) -> bool {
    region.owned_by(&players.me)
        && region.armies > 1
        && !board
            .neighbors(region.id)
            .any(|n| n.owned_by(&players.opponent))
}

/// Plans one transfer per safe source toward its closest neighbor on the
/// distance map.
///
/// The enemy map is used when it has entries, the border map otherwise:
/// once we are in contact with the opponent, reserves head for the opponent
/// even past a closer neutral border.
/// Ties on distance go to the neighbor holding the most armies. A transfer
/// is emitted only when it brings armies strictly closer to the front, and
/// always leaves one army behind. The board is not modified.
pub fn plan_transfers(
    board: &Board,
    players: &Players,
    enemy: &DistanceMap,
    border: &DistanceMap,
) -> Vec<Move> {
    let map = if enemy.is_empty() { border } else { enemy };
    let mut moves = Vec::new();

    for source in board.owned_by(&players.me) {
        if !is_safe_source(board, source, players) {
            continue;
        }
        let Some(&own) = map.get(&source.id) else {
            continue;
        };
        let best = board
            .neighbors(source.id)
            .filter_map(|n| map.get(&n.id).map(|&d| (d, n)))
            .min_by_key(|&(d, n)| (d, Reverse(n.armies), n.id));

        if let Some((d, dest)) = best {
            if d < own {
                trace!(from = %source.id, to = %dest.id, armies = source.armies - 1, "transfer");
                moves.push(Move::attack(&players.me, source.id, dest.id, source.armies - 1));
            }
        }
    }

    moves
}
