//! Minimum dominator sets of a super-region.
//!
//! A dominator set is a subset of a super-region's members whose closed
//! neighborhoods (the region plus its neighbors inside the super-region)
//! cover every member. The solver enumerates every minimum-cardinality
//! dominator set with an explicit depth-first worklist over member bitmasks.
//!
//! Branching rule: take the lowest-indexed member not yet dominated; some
//! region in its closed neighborhood must be in the set, so branch over
//! exactly those. Branches that cannot stay within the best size found so
//! far are cut. Enumeration is exponential, so it is bounded by a member
//! count and a node budget; past either bound a greedy cover is returned.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::board::{RegionId, SuperRegion};

/// Hard ceiling imposed by the 64-bit member masks.
const MAX_MASK_REGIONS: usize = 64;

/// Bounds on the exact enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DominatorLimits {
    /// Super-regions with more members than this use the greedy cover.
    pub max_exact_regions: usize,
    /// Search nodes expanded before falling back to the greedy cover.
    pub max_search_nodes: u64,
}

impl Default for DominatorLimits {
    fn default() -> Self {
        DominatorLimits {
            max_exact_regions: 20,
            max_search_nodes: 200_000,
        }
    }
}

/// The minimum dominator sets of one super-region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DominatorSets {
    /// Each set sorted by id; the list itself is sorted and duplicate-free.
    sets: Vec<Vec<RegionId>>,
    /// False when the greedy fallback produced the single set.
    exact: bool,
}

impl DominatorSets {
    pub fn sets(&self) -> &[Vec<RegionId>] {
        &self.sets
    }

    pub fn is_exact(&self) -> bool {
        self.exact
    }

    /// Cardinality of the sets (0 for an empty super-region).
    pub fn min_size(&self) -> usize {
        self.sets.first().map_or(0, Vec::len)
    }

    /// Number of minimum sets that include the region.
    pub fn score(&self, region: RegionId) -> usize {
        self.sets
            .iter()
            .filter(|s| s.binary_search(&region).is_ok())
            .count()
    }
}

/// Computes the minimum dominator sets of a super-region from its member
/// list and internal edges.
pub(crate) fn solve_dominators(sr: &SuperRegion, limits: &DominatorLimits) -> DominatorSets {
    let members = &sr.members;
    let n = members.len();
    if n == 0 {
        return DominatorSets {
            sets: Vec::new(),
            exact: true,
        };
    }

    if n > MAX_MASK_REGIONS {
        warn!(super_region = %sr.id, regions = n, "super-region too large for member masks, every member dominates");
        let mut all = members.clone();
        all.sort();
        return DominatorSets {
            sets: vec![all],
            exact: false,
        };
    }

    let closed = closed_neighborhoods(members, &sr.internal_edges);

    if n > limits.max_exact_regions.min(MAX_MASK_REGIONS) {
        debug!(super_region = %sr.id, regions = n, "super-region too large for exact dominator search");
        return greedy_cover(members, &closed);
    }

    match exact_covers(&closed, limits.max_search_nodes) {
        Some(masks) => {
            let sets: BTreeSet<Vec<RegionId>> =
                masks.into_iter().map(|m| mask_to_ids(members, m)).collect();
            let sets: Vec<Vec<RegionId>> = sets.into_iter().collect();
            debug!(
                super_region = %sr.id,
                count = sets.len(),
                size = sets.first().map_or(0, Vec::len),
                "solved minimum dominator sets"
            );
            DominatorSets { sets, exact: true }
        }
        None => {
            warn!(
                super_region = %sr.id,
                budget = limits.max_search_nodes,
                "dominator search exhausted its node budget, using greedy cover"
            );
            greedy_cover(members, &closed)
        }
    }
}

/// Bitmask of each member's closed neighborhood restricted to the members.
fn closed_neighborhoods(members: &[RegionId], edges: &[(RegionId, RegionId)]) -> Vec<u64> {
    let index = |id: RegionId| members.iter().position(|&m| m == id);
    let mut masks: Vec<u64> = (0..members.len()).map(|i| 1u64 << i).collect();
    for &(a, b) in edges {
        if let (Some(i), Some(j)) = (index(a), index(b)) {
            masks[i] |= 1u64 << j;
            masks[j] |= 1u64 << i;
        }
    }
    masks
}

fn full_mask(n: usize) -> u64 {
    if n >= 64 {
        u64::MAX
    } else {
        (1u64 << n) - 1
    }
}

/// Enumerates every minimum cover as a member bitmask. Returns `None` when
/// the node budget runs out.
fn exact_covers(closed: &[u64], max_nodes: u64) -> Option<BTreeSet<u64>> {
    let full = full_mask(closed.len());
    let mut best = u32::MAX;
    let mut found: BTreeSet<u64> = BTreeSet::new();
    let mut stack: Vec<(u64, u64)> = vec![(0, 0)];
    let mut nodes = 0u64;

    while let Some((chosen, covered)) = stack.pop() {
        nodes += 1;
        if nodes > max_nodes {
            return None;
        }

        let size = chosen.count_ones();
        if covered == full {
            if size < best {
                best = size;
                found.clear();
            }
            if size == best {
                found.insert(chosen);
            }
            continue;
        }
        if size >= best {
            continue;
        }

        let u = (!covered & full).trailing_zeros() as usize;
        let mut candidates = closed[u];
        while candidates != 0 {
            let v = candidates.trailing_zeros() as usize;
            candidates &= candidates - 1;
            stack.push((chosen | (1u64 << v), covered | closed[v]));
        }
    }

    Some(found)
}

/// Picks the member covering the most undominated regions until done.
fn greedy_cover(members: &[RegionId], closed: &[u64]) -> DominatorSets {
    let full = full_mask(members.len());
    let mut covered = 0u64;
    let mut chosen = 0u64;

    while covered != full {
        let mut best_idx = 0;
        let mut best_gain = 0;
        for (i, &mask) in closed.iter().enumerate() {
            let gain = (mask & !covered).count_ones();
            if gain > best_gain {
                best_gain = gain;
                best_idx = i;
            }
        }
        chosen |= 1u64 << best_idx;
        covered |= closed[best_idx];
    }

    DominatorSets {
        sets: vec![mask_to_ids(members, chosen)],
        exact: false,
    }
}

fn mask_to_ids(members: &[RegionId], mask: u64) -> Vec<RegionId> {
    let mut ids: Vec<RegionId> = members
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1u64 << i) != 0)
        .map(|(_, &id)| id)
        .collect();
    ids.sort();
    ids
}
