//! Troop routing.
//!
//! Builds hop-distance maps from owned regions to the front and plans the
//! transfers that bring interior reserves closer to it.

pub mod distance;
pub mod transfer;

pub use distance::{distance_map, distance_to_border, distance_to_enemy, DistanceMap};
pub use transfer::{is_safe_source, plan_transfers};
