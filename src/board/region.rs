//! Region and super-region definitions.
//!
//! Regions and super-regions are plain records stored in the arenas of a
//! [`Board`](super::graph::Board). Every relationship between them is kept as
//! an id, never as a reference, so a board can be cloned structurally.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::eval::dominator::DominatorSets;

/// Owner name the server uses for regions nobody has taken yet.
pub const NEUTRAL: &str = "neutral";

/// Owner name the server uses for regions outside the fog of war.
pub const UNKNOWN: &str = "unknown";

/// Identifier of a region, as given by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RegionId(pub u32);

/// Identifier of a super-region, as given by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SuperRegionId(pub u32);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SuperRegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who holds a region.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Owner {
    /// Not observable this round.
    #[default]
    Unknown,
    Neutral,
    Player(String),
}

impl Owner {
    /// Parses an owner name from the wire, mapping the two sentinels.
    pub fn from_name(name: &str) -> Owner {
        match name {
            UNKNOWN => Owner::Unknown,
            NEUTRAL => Owner::Neutral,
            other => Owner::Player(other.to_string()),
        }
    }

    /// Returns the wire name of this owner.
    pub fn name(&self) -> &str {
        match self {
            Owner::Unknown => UNKNOWN,
            Owner::Neutral => NEUTRAL,
            Owner::Player(name) => name,
        }
    }

    /// Returns true if this owner is the named player.
    pub fn is(&self, player: &str) -> bool {
        matches!(self, Owner::Player(name) if name == player)
    }
}

/// A single node of the board graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub id: RegionId,
    pub super_region: SuperRegionId,
    /// Adjacent regions in insertion order. Always symmetric across the board.
    pub neighbors: Vec<RegionId>,
    pub owner: Owner,
    pub armies: u32,
    pub wasteland: bool,
}

impl Region {
    /// Creates an unobserved region with no armies.
    pub fn new(id: RegionId, super_region: SuperRegionId) -> Self {
        Region {
            id,
            super_region,
            neighbors: Vec::new(),
            owner: Owner::Unknown,
            armies: 0,
            wasteland: false,
        }
    }

    /// Returns true if the named player holds this region.
    pub fn owned_by(&self, player: &str) -> bool {
        self.owner.is(player)
    }

    pub fn is_neutral(&self) -> bool {
        self.owner == Owner::Neutral
    }

    /// Returns true if `other` is listed as a neighbor.
    pub fn borders(&self, other: RegionId) -> bool {
        self.neighbors.contains(&other)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "region {} ({}, {} armies, super-region {})",
            self.id,
            self.owner.name(),
            self.armies,
            self.super_region
        )
    }
}

/// A bonus group of regions.
#[derive(Debug, Clone)]
pub struct SuperRegion {
    pub id: SuperRegionId,
    /// Armies granted per round to a player holding every member.
    pub reward: u32,
    /// Member regions in setup order.
    pub members: Vec<RegionId>,
    /// Edges joining two members, recorded at setup. Dominator sets are
    /// solved from these alone, so a fogged copy of the board solves the
    /// same topology as the full board.
    pub internal_edges: Vec<(RegionId, RegionId)>,
    /// Minimum dominator sets, computed at most once per topology and shared
    /// by every copy of the board.
    pub(crate) dominators: Arc<OnceLock<DominatorSets>>,
}

impl SuperRegion {
    pub fn new(id: SuperRegionId, reward: u32) -> Self {
        SuperRegion {
            id,
            reward,
            members: Vec::new(),
            internal_edges: Vec::new(),
            dominators: Arc::new(OnceLock::new()),
        }
    }

    pub fn contains(&self, region: RegionId) -> bool {
        self.members.contains(&region)
    }

    /// Drops any cached dominator sets; called whenever topology changes.
    pub(crate) fn reset_dominators(&mut self) {
        self.dominators = Arc::new(OnceLock::new());
    }
}

impl fmt::Display for SuperRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "super-region {} (reward {}, {} regions)",
            self.id,
            self.reward,
            self.members.len()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_sentinels_parse() {
        assert_eq!(Owner::from_name("unknown"), Owner::Unknown);
        assert_eq!(Owner::from_name("neutral"), Owner::Neutral);
        assert_eq!(
            Owner::from_name("player1"),
            Owner::Player("player1".to_string())
        );
    }

    #[test]
    fn owner_name_roundtrip() {
        for name in ["unknown", "neutral", "player2"] {
            assert_eq!(Owner::from_name(name).name(), name);
        }
    }

    #[test]
    fn owned_by_matches_only_players() {
        let mut region = Region::new(RegionId(1), SuperRegionId(1));
        assert!(!region.owned_by("neutral"));
        region.owner = Owner::Neutral;
        assert!(!region.owned_by("neutral"));
        assert!(region.is_neutral());
        region.owner = Owner::Player("me".to_string());
        assert!(region.owned_by("me"));
        assert!(!region.owned_by("them"));
    }

    #[test]
    fn new_region_is_unknown_and_empty() {
        let region = Region::new(RegionId(7), SuperRegionId(2));
        assert_eq!(region.owner, Owner::Unknown);
        assert_eq!(region.armies, 0);
        assert!(!region.wasteland);
        assert!(region.neighbors.is_empty());
    }

    #[test]
    fn display_mentions_owner_and_armies() {
        let mut region = Region::new(RegionId(3), SuperRegionId(1));
        region.owner = Owner::Player("me".to_string());
        region.armies = 4;
        assert_eq!(
            region.to_string(),
            "region 3 (me, 4 armies, super-region 1)"
        );
    }
}
