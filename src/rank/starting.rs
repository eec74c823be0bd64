//! Starting-region estimates.
//!
//! Estimates how many rounds it would take to clear a pickable region's
//! super-region if we started there: the larger of the hop radius needed to
//! reach every member and the reinforcement rounds needed to pay for the
//! attacks against placeholder garrisons.

use std::cmp::Reverse;

use tracing::{debug, warn};

use super::super_region::RankingConfig;
use crate::board::{Board, Region, RegionId};
use crate::eval::{CombatError, CombatTables};

/// Armies needed to take every other member of the region's super-region,
/// assuming placeholder garrisons, minus the army already standing on the
/// start region.
pub fn armies_to_take(
    full: &Board,
    start: &Region,
    tables: &CombatTables,
    config: &RankingConfig,
) -> Result<u32, CombatError> {
    let mut total = 0u32;
    for member in full.members(start.super_region) {
        if member.id == start.id {
            continue;
        }
        let garrison = if member.wasteland {
            config.wasteland_armies
        } else {
            config.neutral_armies
        };
        total += tables.units_to_attack(garrison)?;
    }
    Ok(total.saturating_sub(1))
}

/// Rounds needed to take the whole super-region from `start`.
pub fn turns_to_take(
    full: &Board,
    start: &Region,
    tables: &CombatTables,
    config: &RankingConfig,
    armies_per_turn: u32,
) -> Result<u32, CombatError> {
    let members = full.members(start.super_region).count() as u32;
    let radius = full
        .members(start.super_region)
        .map(|m| full.distance(start.id, m.id).unwrap_or(members))
        .max()
        .unwrap_or(0);
    let armies = armies_to_take(full, start, tables, config)?;
    let paying = armies.div_ceil(armies_per_turn.max(1));
    Ok(radius.max(paying))
}

/// Orders pickable regions: zero-reward super-regions last, then fewest
/// rounds to take, then highest reward, then id.
pub fn rank_starting_regions(
    full: &Board,
    pickable: &[RegionId],
    tables: &CombatTables,
    config: &RankingConfig,
    armies_per_turn: u32,
) -> Vec<RegionId> {
    let mut keyed: Vec<(bool, u32, Reverse<u32>, RegionId)> = pickable
        .iter()
        .filter_map(|&id| full.region(id))
        .map(|region| {
            let reward = full
                .super_region(region.super_region)
                .map_or(0, |sr| sr.reward);
            let turns = turns_to_take(full, region, tables, config, armies_per_turn)
                .unwrap_or_else(|e| {
                    warn!(region = %region.id, error = %e, "cannot estimate turns to take");
                    u32::MAX
                });
            (reward == 0, turns, Reverse(reward), region.id)
        })
        .collect();
    keyed.sort();

    let ranked: Vec<RegionId> = keyed.into_iter().map(|k| k.3).collect();
    debug!(ranked = ?ranked.iter().map(|r| r.0).collect::<Vec<_>>(), "ranked starting regions");
    ranked
}
