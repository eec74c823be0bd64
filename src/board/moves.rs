//! Move types produced by the planner and read from opponent reports.
//!
//! A move is either an army placement or an attack/transfer between two
//! adjacent regions. Both share the issuing player and an optional
//! illegal-move note that only matters when formatting.

use super::region::RegionId;

/// The action part of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// `<player> place_armies <region> <armies>`
    PlaceArmies { region: RegionId, armies: u32 },

    /// `<player> attack/transfer <from> <to> <armies>`
    AttackTransfer {
        from: RegionId,
        to: RegionId,
        armies: u32,
    },
}

/// A single move issued by a player.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    pub player: String,
    pub kind: MoveKind,
    /// Reason the server rejected this move, if it did.
    pub illegal: Option<String>,
}

impl Move {
    pub fn place(player: &str, region: RegionId, armies: u32) -> Self {
        Move {
            player: player.to_string(),
            kind: MoveKind::PlaceArmies { region, armies },
            illegal: None,
        }
    }

    pub fn attack(player: &str, from: RegionId, to: RegionId, armies: u32) -> Self {
        Move {
            player: player.to_string(),
            kind: MoveKind::AttackTransfer { from, to, armies },
            illegal: None,
        }
    }

    /// Number of armies the move places or sends.
    pub fn armies(&self) -> u32 {
        match self.kind {
            MoveKind::PlaceArmies { armies, .. } => armies,
            MoveKind::AttackTransfer { armies, .. } => armies,
        }
    }

    /// Destination of an attack/transfer, `None` for placements.
    pub fn target(&self) -> Option<RegionId> {
        match self.kind {
            MoveKind::AttackTransfer { to, .. } => Some(to),
            MoveKind::PlaceArmies { .. } => None,
        }
    }

    pub fn is_placement(&self) -> bool {
        matches!(self.kind, MoveKind::PlaceArmies { .. })
    }
}
