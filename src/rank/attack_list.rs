//! Ordered list of regions worth attacking this round.
//!
//! Every visible region we do not hold is a candidate. Candidates are
//! ordered by:
//!
//! 1. neutral regions inside a super-region the opponent has a foothold in
//!    go last;
//! 2. rank of their super-region (most urgent first);
//! 3. inside a super-region we already dominate, the weakest garrison first;
//!    otherwise the region appearing in the most minimum dominator sets.
//!
//! A super-region we do not dominate yet contributes at most
//! `max_targets_per_open_super_region` targets.

use std::cmp::{Ordering, Reverse};
use std::collections::HashMap;

use tracing::{debug, trace};

use super::super_region::{weighted_armies, RankingConfig, SuperRegionRanking};
use crate::board::{Board, Region, RegionId, SuperRegionId};
use crate::eval::DominatorLimits;
use crate::state::Players;

/// Sort key of one candidate.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: RegionId,
    super_region: SuperRegionId,
    neutral_in_enemy_territory: bool,
    super_region_rank: usize,
    dominated: bool,
    weighted_armies: u32,
    dominator_score: usize,
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    a.neutral_in_enemy_territory
        .cmp(&b.neutral_in_enemy_territory)
        .then(a.super_region_rank.cmp(&b.super_region_rank))
        .then_with(|| {
            if a.dominated && b.dominated {
                a.weighted_armies.cmp(&b.weighted_armies)
            } else {
                Reverse(a.dominator_score).cmp(&Reverse(b.dominator_score))
            }
        })
        .then(a.id.cmp(&b.id))
}

/// Ranks attack targets on the visible board.
///
/// Dominator sets are looked up on the full board, whose topology is
/// complete; the visible board only supplies ownership and armies.
pub fn rank_attack_targets(
    full: &Board,
    visible: &Board,
    ranking: &SuperRegionRanking,
    players: &Players,
    config: &RankingConfig,
    limits: &DominatorLimits,
) -> Vec<RegionId> {
    let mut dominated: HashMap<SuperRegionId, bool> = HashMap::new();
    let mut enemy_present: HashMap<SuperRegionId, bool> = HashMap::new();

    let mut candidates: Vec<Candidate> = visible
        .regions()
        .filter(|r| !r.owned_by(&players.me))
        .map(|r| {
            let sr = r.super_region;
            let is_dominated = *dominated
                .entry(sr)
                .or_insert_with(|| visible.is_dominated_by(sr, &players.me));
            let has_enemy = *enemy_present.entry(sr).or_insert_with(|| {
                visible.members(sr).any(|m| m.owned_by(&players.opponent))
            });
            Candidate {
                id: r.id,
                super_region: sr,
                neutral_in_enemy_territory: r.is_neutral() && has_enemy,
                super_region_rank: ranking.position(sr).unwrap_or(usize::MAX),
                dominated: is_dominated,
                weighted_armies: weighted_armies(r, players, config),
                dominator_score: dominator_score(full, r, limits),
            }
        })
        .collect();

    candidates.sort_by(compare_candidates);

    let mut taken: HashMap<SuperRegionId, usize> = HashMap::new();
    let targets: Vec<RegionId> = candidates
        .iter()
        .filter(|c| {
            if c.dominated {
                return true;
            }
            let count = taken.entry(c.super_region).or_insert(0);
            if *count < config.max_targets_per_open_super_region {
                *count += 1;
                true
            } else {
                false
            }
        })
        .map(|c| c.id)
        .collect();

    debug!(targets = ?targets.iter().map(|r| r.0).collect::<Vec<_>>(), "ranked attack list");
    targets
}

/// Number of minimum dominator sets of the region's super-region that
/// contain it.
pub fn dominator_score(full: &Board, region: &Region, limits: &DominatorLimits) -> usize {
    let score = full
        .dominators(region.super_region, limits)
        .map_or(0, |d| d.score(region.id));
    trace!(region = %region.id, score, "dominator score");
    score
}
