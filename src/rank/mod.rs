//! Target selection: which super-regions to pursue, which regions to hit,
//! where to start, and which borders are under pressure.

pub mod attack_list;
pub mod starting;
pub mod super_region;
pub mod threat;

pub use attack_list::{dominator_score, rank_attack_targets};
pub use starting::{armies_to_take, rank_starting_regions, turns_to_take};
pub use super_region::{
    clearing_cost, compare_super_regions, rank_super_regions, weighted_armies, RankingConfig,
    SuperRegionRank, SuperRegionRanking,
};
pub use threat::{rank_threatened_regions, strongest_enemy_neighbor};
