//! Super-region conquest priority.
//!
//! Super-regions are ordered from cheapest to clear to most expensive, with
//! reward breaking ties and zero-reward super-regions always last. The cost
//! of a super-region is the sum over its members not held by us of their
//! army count, discounted for opponent garrisons, or a placeholder when the
//! region shows no armies (unobserved regions, mostly).

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, Region, SuperRegionId};
use crate::state::Players;

/// Weights shared by the rankers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    /// Multiplier applied to opponent garrisons, which are expected to have
    /// bled before we reach them.
    pub enemy_ownership_factor: f64,
    /// Assumed garrison of an unobserved wasteland.
    pub wasteland_armies: u32,
    /// Assumed garrison of an unobserved ordinary region.
    pub neutral_armies: u32,
    /// Cap on targets taken from one super-region we do not dominate yet.
    pub max_targets_per_open_super_region: usize,
}

impl Default for RankingConfig {
    fn default() -> Self {
        RankingConfig {
            enemy_ownership_factor: 0.8,
            wasteland_armies: 6,
            neutral_armies: 2,
            max_targets_per_open_super_region: 2,
        }
    }
}

/// Armies on a region, discounted when the opponent holds it.
pub fn weighted_armies(region: &Region, players: &Players, config: &RankingConfig) -> u32 {
    if region.owned_by(&players.opponent) {
        (region.armies as f64 * config.enemy_ownership_factor).floor() as u32
    } else {
        region.armies
    }
}

/// Armies we expect to face when taking a region.
pub fn clearing_cost(region: &Region, players: &Players, config: &RankingConfig) -> u32 {
    if region.armies == 0 {
        if region.wasteland {
            config.wasteland_armies
        } else {
            config.neutral_armies
        }
    } else {
        weighted_armies(region, players, config)
    }
}

/// One entry of the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuperRegionRank {
    pub id: SuperRegionId,
    pub reward: u32,
    /// Enemy-weighted armies standing between us and the bonus.
    pub strength: u32,
}

/// Ordering used by the ranking: zero rewards last, then weaker first, then
/// richer first, then id.
pub fn compare_super_regions(a: &SuperRegionRank, b: &SuperRegionRank) -> Ordering {
    let key = |r: &SuperRegionRank| (r.reward == 0, r.strength, Reverse(r.reward), r.id);
    key(a).cmp(&key(b))
}

/// Super-regions ordered by conquest priority.
#[derive(Debug, Clone, Default)]
pub struct SuperRegionRanking {
    order: Vec<SuperRegionRank>,
    index: HashMap<SuperRegionId, usize>,
}

impl SuperRegionRanking {
    /// Entries, most urgent first.
    pub fn order(&self) -> &[SuperRegionRank] {
        &self.order
    }

    /// Rank index of a super-region (0 = most urgent).
    pub fn position(&self, id: SuperRegionId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// Ranks every super-region of the full board.
///
/// Member data comes from the visible board when the region is visible and
/// from the full board otherwise; regions are matched by id.
pub fn rank_super_regions(
    full: &Board,
    visible: Option<&Board>,
    players: &Players,
    config: &RankingConfig,
) -> SuperRegionRanking {
    let mut order: Vec<SuperRegionRank> = full
        .super_regions()
        .map(|sr| {
            let strength = sr
                .members
                .iter()
                .filter_map(|&id| visible.and_then(|v| v.region(id)).or_else(|| full.region(id)))
                .filter(|r| !r.owned_by(&players.me))
                .map(|r| clearing_cost(r, players, config))
                .sum();
            SuperRegionRank {
                id: sr.id,
                reward: sr.reward,
                strength,
            }
        })
        .collect();

    order.sort_by(compare_super_regions);

    let index = order.iter().enumerate().map(|(i, r)| (r.id, i)).collect();
    debug!(ranking = ?order.iter().map(|r| r.id.0).collect::<Vec<_>>(), "ranked super-regions");

    SuperRegionRanking { order, index }
}
