//! Board evaluation primitives.
//!
//! Worst-case combat arithmetic and the structural dominator-set measure
//! used by the rankers to judge how hard a super-region is to secure.

pub mod combat;
pub mod dominator;

pub use combat::{CombatConfig, CombatError, CombatTables};
pub use dominator::{DominatorLimits, DominatorSets};
