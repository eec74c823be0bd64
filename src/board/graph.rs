//! Board graph: arenas of regions and super-regions keyed by id.
//!
//! Two boards live side by side during a game: the full board, built once
//! from the map definition, and a visible copy rebuilt every round from
//! [`Board::visible_copy`]. Both share ids, so cross-references are always
//! resolved by id.

use std::collections::{BTreeMap, VecDeque};

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, warn};

use super::region::{Owner, Region, RegionId, SuperRegion, SuperRegionId};
use crate::eval::dominator::{solve_dominators, DominatorLimits, DominatorSets};

/// Errors raised while building the board topology.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("duplicate super-region {0}")]
    DuplicateSuperRegion(SuperRegionId),

    #[error("duplicate region {0}")]
    DuplicateRegion(RegionId),

    #[error("unknown super-region {0}")]
    UnknownSuperRegion(SuperRegionId),

    #[error("unknown region {0}")]
    UnknownRegion(RegionId),
}

/// Ownership and army data observed for one region at the start of a round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionUpdate {
    pub region: RegionId,
    pub owner: Owner,
    pub armies: u32,
}

/// Regions and super-regions of one board snapshot.
#[derive(Debug, Clone, Default)]
pub struct Board {
    regions: BTreeMap<RegionId, Region>,
    super_regions: BTreeMap<SuperRegionId, SuperRegion>,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Board::default()
    }

    /// Registers a super-region with its reward.
    pub fn add_super_region(&mut self, id: SuperRegionId, reward: u32) -> Result<(), BoardError> {
        if self.super_regions.contains_key(&id) {
            return Err(BoardError::DuplicateSuperRegion(id));
        }
        self.super_regions.insert(id, SuperRegion::new(id, reward));
        Ok(())
    }

    /// Registers a region inside an existing super-region.
    pub fn add_region(&mut self, id: RegionId, super_region: SuperRegionId) -> Result<(), BoardError> {
        if self.regions.contains_key(&id) {
            return Err(BoardError::DuplicateRegion(id));
        }
        let sr = self
            .super_regions
            .get_mut(&super_region)
            .ok_or(BoardError::UnknownSuperRegion(super_region))?;
        sr.members.push(id);
        sr.reset_dominators();
        self.regions.insert(id, Region::new(id, super_region));
        Ok(())
    }

    /// Adds an undirected edge. Adding an existing edge or a self-loop is a no-op.
    pub fn connect(&mut self, a: RegionId, b: RegionId) -> Result<(), BoardError> {
        if !self.regions.contains_key(&a) {
            return Err(BoardError::UnknownRegion(a));
        }
        if !self.regions.contains_key(&b) {
            return Err(BoardError::UnknownRegion(b));
        }
        if a == b {
            return Ok(());
        }

        let mut touched = Vec::with_capacity(2);
        for (from, to) in [(a, b), (b, a)] {
            if let Some(region) = self.regions.get_mut(&from) {
                if !region.neighbors.contains(&to) {
                    region.neighbors.push(to);
                    touched.push(region.super_region);
                }
            }
        }
        let internal = touched.len() == 2 && touched[0] == touched[1];
        for sr in touched {
            if let Some(sr) = self.super_regions.get_mut(&sr) {
                if internal && !sr.internal_edges.contains(&(a, b)) {
                    sr.internal_edges.push((a, b));
                }
                sr.reset_dominators();
            }
        }
        Ok(())
    }

    /// Flags a region as a wasteland.
    pub fn mark_wasteland(&mut self, id: RegionId) -> Result<(), BoardError> {
        let region = self
            .regions
            .get_mut(&id)
            .ok_or(BoardError::UnknownRegion(id))?;
        region.wasteland = true;
        Ok(())
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(&id)
    }

    pub fn region_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.regions.get_mut(&id)
    }

    pub fn super_region(&self, id: SuperRegionId) -> Option<&SuperRegion> {
        self.super_regions.get(&id)
    }

    /// Iterates regions in id order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Iterates super-regions in id order.
    pub fn super_regions(&self) -> impl Iterator<Item = &SuperRegion> {
        self.super_regions.values()
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Iterates the neighbors of a region that are present on this board.
    pub fn neighbors(&self, id: RegionId) -> impl Iterator<Item = &Region> {
        self.regions
            .get(&id)
            .into_iter()
            .flat_map(|r| r.neighbors.iter())
            .filter_map(|n| self.regions.get(n))
    }

    /// Iterates the member regions of a super-region present on this board.
    pub fn members(&self, id: SuperRegionId) -> impl Iterator<Item = &Region> {
        self.super_regions
            .get(&id)
            .into_iter()
            .flat_map(|sr| sr.members.iter())
            .filter_map(|m| self.regions.get(m))
    }

    /// Iterates every region held by the named player.
    pub fn owned_by<'a>(&'a self, player: &'a str) -> impl Iterator<Item = &'a Region> + 'a {
        self.regions.values().filter(move |r| r.owned_by(player))
    }

    /// Clones this board, overlays the round's observations, and drops every
    /// region that is still unknown afterwards.
    ///
    /// Super-region member lists and neighbor lists keep the full topology,
    /// so lookups through them must tolerate missing regions.
    pub fn visible_copy(&self, updates: &[RegionUpdate]) -> Board {
        let mut visible = self.clone();
        for update in updates {
            match visible.regions.get_mut(&update.region) {
                Some(region) => {
                    region.owner = update.owner.clone();
                    region.armies = update.armies;
                }
                None => warn!(region = %update.region, "update for region not on the map"),
            }
        }
        visible.regions.retain(|_, r| r.owner != Owner::Unknown);
        debug!(
            visible = visible.regions.len(),
            total = self.regions.len(),
            "rebuilt visible board"
        );
        visible
    }

    /// Returns true if every member of the super-region is owned by the player
    /// or adjacent to a region the player owns.
    pub fn is_dominated_by(&self, id: SuperRegionId, player: &str) -> bool {
        let Some(sr) = self.super_regions.get(&id) else {
            return false;
        };
        let owned: Vec<&Region> = self.owned_by(player).collect();
        sr.members.iter().all(|&m| {
            owned.iter().any(|r| r.id == m || r.borders(m))
        })
    }

    /// Returns the hop distance between two regions, or `None` if either is
    /// absent or they are disconnected on this board.
    pub fn distance(&self, from: RegionId, to: RegionId) -> Option<u32> {
        if !self.regions.contains_key(&from) || !self.regions.contains_key(&to) {
            return None;
        }
        let mut dist: BTreeMap<RegionId, u32> = BTreeMap::new();
        let mut queue = VecDeque::new();
        dist.insert(from, 0);
        queue.push_back(from);

        while let Some(cur) = queue.pop_front() {
            let d = dist[&cur];
            if cur == to {
                return Some(d);
            }
            for next in self.neighbors(cur) {
                if !dist.contains_key(&next.id) {
                    dist.insert(next.id, d + 1);
                    queue.push_back(next.id);
                }
            }
        }
        None
    }

    /// Returns the minimum dominator sets of a super-region, computing and
    /// caching them on first use.
    pub fn dominators(&self, id: SuperRegionId, limits: &DominatorLimits) -> Option<&DominatorSets> {
        let sr = self.super_regions.get(&id)?;
        Some(sr.dominators.get_or_init(|| solve_dominators(sr, limits)))
    }

    /// Computes every super-region's dominator sets up front, in parallel.
    pub fn warm_dominators(&self, limits: &DominatorLimits) {
        let srs: Vec<&SuperRegion> = self.super_regions.values().collect();
        srs.par_iter().for_each(|sr| {
            sr.dominators.get_or_init(|| solve_dominators(sr, limits));
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::{board, set};

    fn chain() -> Board {
        // 1 - 2 - 3 - 4, all in super-region 1; 5 alone in super-region 2.
        board(
            &[(1, 3), (2, 0)],
            &[(1, 1), (2, 1), (3, 1), (4, 1), (5, 2)],
            &[(1, 2), (2, 3), (3, 4)],
        )
    }

    #[test]
    fn connect_is_symmetric() {
        let b = chain();
        assert!(b.region(RegionId(1)).unwrap().borders(RegionId(2)));
        assert!(b.region(RegionId(2)).unwrap().borders(RegionId(1)));
    }

    #[test]
    fn connect_twice_keeps_single_edge() {
        let mut b = chain();
        b.connect(RegionId(1), RegionId(2)).unwrap();
        b.connect(RegionId(2), RegionId(1)).unwrap();
        assert_eq!(b.region(RegionId(1)).unwrap().neighbors, vec![RegionId(2)]);
    }

    #[test]
    fn connect_unknown_region_fails() {
        let mut b = chain();
        assert_eq!(
            b.connect(RegionId(1), RegionId(99)),
            Err(BoardError::UnknownRegion(RegionId(99)))
        );
    }

    #[test]
    fn add_region_rejects_duplicates_and_unknown_super_region() {
        let mut b = chain();
        assert_eq!(
            b.add_region(RegionId(1), SuperRegionId(1)),
            Err(BoardError::DuplicateRegion(RegionId(1)))
        );
        assert_eq!(
            b.add_region(RegionId(10), SuperRegionId(9)),
            Err(BoardError::UnknownSuperRegion(SuperRegionId(9)))
        );
        assert_eq!(
            b.add_super_region(SuperRegionId(1), 4),
            Err(BoardError::DuplicateSuperRegion(SuperRegionId(1)))
        );
    }

    #[test]
    fn members_follow_setup_order() {
        let b = chain();
        let sr = b.super_region(SuperRegionId(1)).unwrap();
        assert_eq!(
            sr.members,
            vec![RegionId(1), RegionId(2), RegionId(3), RegionId(4)]
        );
    }

    #[test]
    fn visible_copy_drops_unknown_regions() {
        let b = chain();
        let updates = vec![
            RegionUpdate { region: RegionId(1), owner: Owner::Player("me".into()), armies: 3 },
            RegionUpdate { region: RegionId(2), owner: Owner::Neutral, armies: 2 },
        ];
        let visible = b.visible_copy(&updates);
        assert_eq!(visible.region_count(), 2);
        assert_eq!(visible.region(RegionId(1)).unwrap().armies, 3);
        assert!(visible.region(RegionId(3)).is_none());
        // Full board untouched.
        assert_eq!(b.region(RegionId(1)).unwrap().owner, Owner::Unknown);
        // Topology is kept in full.
        assert_eq!(visible.super_region(SuperRegionId(1)).unwrap().members.len(), 4);
    }

    #[test]
    fn visible_copy_ignores_updates_for_missing_regions() {
        let b = chain();
        let updates = vec![RegionUpdate {
            region: RegionId(42),
            owner: Owner::Neutral,
            armies: 2,
        }];
        assert_eq!(b.visible_copy(&updates).region_count(), 0);
    }

    #[test]
    fn neighbors_skip_missing_regions() {
        let b = chain();
        let visible = b.visible_copy(&[
            RegionUpdate { region: RegionId(2), owner: Owner::Neutral, armies: 2 },
            RegionUpdate { region: RegionId(3), owner: Owner::Neutral, armies: 2 },
        ]);
        let ids: Vec<RegionId> = visible.neighbors(RegionId(2)).map(|r| r.id).collect();
        assert_eq!(ids, vec![RegionId(3)]);
    }

    #[test]
    fn dominated_uses_closed_neighborhoods() {
        let mut b = chain();
        set(&mut b, 2, "me", 1);
        // 2 covers 1, 2, 3 but not 4.
        assert!(!b.is_dominated_by(SuperRegionId(1), "me"));
        set(&mut b, 4, "me", 1);
        assert!(b.is_dominated_by(SuperRegionId(1), "me"));
        assert!(!b.is_dominated_by(SuperRegionId(1), "them"));
    }

    #[test]
    fn distance_counts_hops() {
        let b = chain();
        assert_eq!(b.distance(RegionId(1), RegionId(1)), Some(0));
        assert_eq!(b.distance(RegionId(1), RegionId(4)), Some(3));
        assert_eq!(b.distance(RegionId(1), RegionId(5)), None);
        assert_eq!(b.distance(RegionId(1), RegionId(77)), None);
    }

    #[test]
    fn dominator_cache_is_shared_with_copies() {
        let b = chain();
        let limits = DominatorLimits::default();
        let visible = b.visible_copy(&[]);
        let first = b.dominators(SuperRegionId(1), &limits).unwrap() as *const DominatorSets;
        let second = visible.dominators(SuperRegionId(1), &limits).unwrap() as *const DominatorSets;
        assert_eq!(first, second);
    }

    #[test]
    fn fogged_copy_solves_full_topology() {
        // 1 - 2 - 3 with 2 out of sight.
        let b = board(&[(1, 2)], &[(1, 1), (2, 1), (3, 1)], &[(1, 2), (2, 3)]);
        let visible = b.visible_copy(&[
            RegionUpdate { region: RegionId(1), owner: Owner::Neutral, armies: 2 },
            RegionUpdate { region: RegionId(3), owner: Owner::Neutral, armies: 2 },
        ]);
        let limits = DominatorLimits::default();
        assert_eq!(
            visible.dominators(SuperRegionId(1), &limits).unwrap().sets(),
            &[vec![RegionId(2)]]
        );
        assert_eq!(
            b.dominators(SuperRegionId(1), &limits).unwrap().sets(),
            &[vec![RegionId(2)]]
        );
    }

    #[test]
    fn internal_edges_skip_cross_border_links() {
        let mut b = chain();
        b.connect(RegionId(4), RegionId(5)).unwrap();
        b.connect(RegionId(2), RegionId(1)).unwrap();
        let sr1 = b.super_region(SuperRegionId(1)).unwrap();
        assert_eq!(
            sr1.internal_edges,
            vec![
                (RegionId(1), RegionId(2)),
                (RegionId(2), RegionId(3)),
                (RegionId(3), RegionId(4)),
            ]
        );
        assert!(b.super_region(SuperRegionId(2)).unwrap().internal_edges.is_empty());
    }

    #[test]
    fn connect_resets_dominator_cache() {
        let mut b = chain();
        let limits = DominatorLimits::default();
        assert_eq!(b.dominators(SuperRegionId(1), &limits).unwrap().min_size(), 2);
        b.connect(RegionId(1), RegionId(4)).unwrap();
        b.connect(RegionId(1), RegionId(3)).unwrap();
        assert_eq!(b.dominators(SuperRegionId(1), &limits).unwrap().min_size(), 1);
    }

    #[test]
    fn warm_dominators_fills_every_cache() {
        let b = chain();
        b.warm_dominators(&DominatorLimits::default());
        for sr in b.super_regions() {
            assert!(sr.dominators.get().is_some());
        }
    }
}
