//! Border regions ordered by how hard the opponent leans on them.

use std::cmp::Reverse;

use crate::board::{Board, RegionId};
use crate::state::Players;

/// Largest opponent stack adjacent to a region, `None` when no opponent
/// region borders it.
pub fn strongest_enemy_neighbor(board: &Board, region: RegionId, players: &Players) -> Option<u32> {
    board
        .neighbors(region)
        .filter(|n| n.owned_by(&players.opponent))
        .map(|n| n.armies)
        .max()
}

/// Owned regions bordering the opponent, most threatened first (ties by id).
pub fn rank_threatened_regions(board: &Board, players: &Players) -> Vec<RegionId> {
    let mut threatened: Vec<(Reverse<u32>, RegionId)> = board
        .owned_by(&players.me)
        .filter_map(|r| strongest_enemy_neighbor(board, r.id, players).map(|t| (Reverse(t), r.id)))
        .collect();
    threatened.sort();
    threatened.into_iter().map(|(_, id)| id).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::{board, set};

    #[test]
    fn orders_by_strongest_adjacent_enemy() {
        // 1 - 2 - 3 - 4 - 5
        let mut b = board(
            &[(1, 1)],
            &[(1, 1), (2, 1), (3, 1), (4, 1), (5, 1)],
            &[(1, 2), (2, 3), (3, 4), (4, 5)],
        );
        set(&mut b, 1, "them", 3);
        set(&mut b, 2, "me", 1);
        set(&mut b, 3, "me", 1);
        set(&mut b, 4, "me", 1);
        set(&mut b, 5, "them", 9);
        let players = Players::new("me", "them");
        assert_eq!(rank_threatened_regions(&b, &players), vec![RegionId(4), RegionId(2)]);
        assert_eq!(strongest_enemy_neighbor(&b, RegionId(3), &players), None);
    }

    #[test]
    fn neutral_neighbors_are_not_threats() {
        let mut b = board(&[(1, 1)], &[(1, 1), (2, 1)], &[(1, 2)]);
        set(&mut b, 1, "me", 2);
        set(&mut b, 2, "neutral", 50);
        assert!(rank_threatened_regions(&b, &Players::new("me", "them")).is_empty());
    }
}
