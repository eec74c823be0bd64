//! Hop distances from owned regions to the front.
//!
//! Every owned region with a neighbor matching the frontier predicate is
//! seeded at distance 0. Distances then relax outward through owned regions
//! with an explicit worklist; a region is re-queued only when a strictly
//! shorter distance is written, which bounds the work on cyclic graphs.
//! Regions that cannot reach the frontier through owned territory are left
//! out of the map.

use std::collections::{BTreeMap, VecDeque};

use crate::board::{Board, Region, RegionId};
use crate::state::Players;

/// Sparse region -> hop distance map.
pub type DistanceMap = BTreeMap<RegionId, u32>;

/// Builds the distance map of `player`'s regions to regions matching
/// `frontier`.
pub fn distance_map<F>(board: &Board, player: &str, frontier: F) -> DistanceMap
where
    F: Fn(&Region) -> bool,
{
    let mut dist = DistanceMap::new();
    let mut queue = VecDeque::new();

    for region in board.owned_by(player) {
        if board.neighbors(region.id).any(&frontier) {
            dist.insert(region.id, 0);
            queue.push_back(region.id);
        }
    }

    while let Some(cur) = queue.pop_front() {
        let next = dist[&cur] + 1;
        for n in board.neighbors(cur) {
            if !n.owned_by(player) {
                continue;
            }
            let improved = dist.get(&n.id).map_or(true, |&d| next < d);
            if improved {
                dist.insert(n.id, next);
                queue.push_back(n.id);
            }
        }
    }

    dist
}

/// Distances to regions held by the opponent.
pub fn distance_to_enemy(board: &Board, players: &Players) -> DistanceMap {
    distance_map(board, &players.me, |r| r.owned_by(&players.opponent))
}

/// Distances to any region we do not hold.
pub fn distance_to_border(board: &Board, players: &Players) -> DistanceMap {
    distance_map(board, &players.me, |r| !r.owned_by(&players.me))
}
