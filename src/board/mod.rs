//! Board representation.
//!
//! Contains the region and super-region records, the arena-backed board
//! graph, and the move types exchanged with the server.

pub mod graph;
pub mod moves;
pub mod region;

pub use graph::{Board, BoardError, RegionUpdate};
pub use moves::{Move, MoveKind};
pub use region::{Owner, Region, RegionId, SuperRegion, SuperRegionId, NEUTRAL, UNKNOWN};
