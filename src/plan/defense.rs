//! Defensive pass and remainder distribution.
//!
//! The defensive pass visits super-regions where the opponent holds ground
//! and every one of our regions there is in contact with the opponent,
//! richest first. Where we have a foothold, the strongest foothold is topped
//! up to hold against the strongest adjacent enemy stack. Where we do not,
//! the weakest enemy region we border is counter-attacked from our strongest
//! neighbor of it. Enemy regions already under attack this round are left
//! alone.

use std::cmp::Reverse;

use tracing::{debug, info, warn};

use super::round::RoundPlan;
use super::{Deadline, PlanError, RoundConfig};
use crate::board::{RegionId, SuperRegionId};
use crate::rank::rank_threatened_regions;

/// Super-regions worth defending, richest first.
fn contested_super_regions(plan: &RoundPlan<'_>) -> Vec<SuperRegionId> {
    let board = &plan.board;
    let players = plan.players;
    let mut contested: Vec<(Reverse<u32>, SuperRegionId)> = board
        .super_regions()
        .filter(|sr| board.members(sr.id).any(|r| r.owned_by(&players.opponent)))
        .filter(|sr| {
            board
                .members(sr.id)
                .filter(|r| r.owned_by(&players.me))
                .all(|r| board.neighbors(r.id).any(|n| n.owned_by(&players.opponent)))
        })
        .map(|sr| (Reverse(sr.reward), sr.id))
        .collect();
    contested.sort();
    contested.into_iter().map(|(_, id)| id).collect()
}

/// Reinforces or counter-attacks on every contested super-region.
pub fn defensive_pass(plan: &mut RoundPlan<'_>, config: &RoundConfig, deadline: &Deadline) -> Result<(), PlanError> {
    let contested = contested_super_regions(plan);
    debug!(super_regions = ?contested.iter().map(|s| s.0).collect::<Vec<_>>(), "defensive plan");

    for sr in contested {
        if deadline.should_stop() {
            warn!(super_region = %sr, "round budget spent, defensive pass cut short");
            break;
        }
        let foothold = plan
            .board
            .members(sr)
            .filter(|r| r.owned_by(&plan.players.me))
            .max_by_key(|r| (r.armies, Reverse(r.id)))
            .map(|r| r.id);

        match foothold {
            Some(region) => hold(plan, config, sr, region)?,
            None => counter_attack(plan, config, sr)?,
        }
    }
    Ok(())
}

/// Tops up `region` so it survives the strongest enemy stack next to it.
fn hold(plan: &mut RoundPlan<'_>, config: &RoundConfig, sr: SuperRegionId, region: RegionId) -> Result<(), PlanError> {
    let threat = plan
        .board
        .members(sr)
        .filter(|r| r.owned_by(&plan.players.opponent) && r.borders(region))
        .filter(|r| !plan.is_targeted(r.id))
        .max_by_key(|r| (r.armies, Reverse(r.id)))
        .map(|r| (r.id, r.armies));

    let Some((enemy, enemy_armies)) = threat else {
        debug!(super_region = %sr, region = %region, "no untargeted threat next to foothold");
        return Ok(());
    };

    let needed = (enemy_armies as f64 / config.defensive_hold_factor).ceil() as u32;
    if enemy_armies <= needed {
        return Ok(());
    }
    let shortfall = needed.saturating_sub(plan.armies(region)?);
    if shortfall == 0 {
        return Ok(());
    }
    if shortfall <= plan.pool {
        info!(region = %region, recruit = shortfall, threat = %enemy, "recruiting for defense");
        plan.place(region, shortfall)?;
    } else {
        info!(region = %region, required = shortfall, available = plan.pool, "insufficient armies to defend");
    }
    Ok(())
}

/// Hits the weakest enemy region of `sr` that we border.
fn counter_attack(plan: &mut RoundPlan<'_>, config: &RoundConfig, sr: SuperRegionId) -> Result<(), PlanError> {
    let me = &plan.players.me;
    let weakest = plan
        .board
        .members(sr)
        .filter(|r| r.owned_by(&plan.players.opponent))
        .filter(|r| plan.board.neighbors(r.id).any(|n| n.owned_by(me)))
        .filter(|r| !plan.is_targeted(r.id))
        .min_by_key(|r| (r.armies, r.id))
        .map(|r| (r.id, r.armies));

    let Some((enemy, enemy_armies)) = weakest else {
        debug!(super_region = %sr, "no untargeted enemy region in reach");
        return Ok(());
    };

    let Some(source) = plan
        .board
        .neighbors(enemy)
        .filter(|n| n.owned_by(me))
        .max_by_key(|n| (n.armies, Reverse(n.id)))
        .map(|n| n.id)
    else {
        warn!(target = %enemy, "no owned region borders counter-attack target");
        return Ok(());
    };

    let needed = (config.counter_attack_factor * enemy_armies as f64).ceil() as u32;
    if needed == 0 {
        return Ok(());
    }

    let armies = plan.armies(source)?;
    if armies <= needed {
        let recruit = needed + 1 - armies;
        if recruit <= plan.pool {
            info!(region = %source, recruit, target = %enemy, "recruiting for counter-attack");
            plan.place(source, recruit)?;
        } else {
            info!(target = %enemy, required = recruit, available = plan.pool, "insufficient armies to counter-attack");
        }
    }

    if plan.armies(source)? > needed {
        info!(from = %source, to = %enemy, armies = needed, "launching counter-attack");
        plan.attack(source, enemy, needed)?;
    }
    Ok(())
}

/// Regions that receive leftover reinforcements: those bordering the
/// opponent, most threatened first; failing that, those bordering any
/// region we do not hold; failing that, our strongest region.
pub fn distribution_targets(plan: &RoundPlan<'_>) -> Vec<RegionId> {
    let board = &plan.board;
    let players = plan.players;

    let threatened = rank_threatened_regions(board, players);
    if !threatened.is_empty() {
        return threatened;
    }

    let border: Vec<RegionId> = board
        .owned_by(&players.me)
        .filter(|r| board.neighbors(r.id).any(|n| !n.owned_by(&players.me)))
        .map(|r| r.id)
        .collect();
    if !border.is_empty() {
        return border;
    }

    board
        .owned_by(&players.me)
        .max_by_key(|r| (r.armies, Reverse(r.id)))
        .map(|r| vec![r.id])
        .unwrap_or_default()
}

/// Splits the remaining pool evenly across the distribution targets, the
/// first targets taking one extra army each until the remainder is gone.
pub fn distribute_remaining(plan: &mut RoundPlan<'_>) -> Result<(), PlanError> {
    if plan.pool == 0 {
        return Ok(());
    }
    let targets = distribution_targets(plan);
    if targets.is_empty() {
        warn!(pool = plan.pool, "no owned region to place remaining armies on");
        return Ok(());
    }

    info!(pool = plan.pool, regions = targets.len(), "distributing remaining armies");
    let count = targets.len() as u32;
    let per_region = plan.pool / count;
    let mut leftover = plan.pool % count;

    for region in targets {
        let mut armies = per_region;
        if leftover > 0 {
            armies += 1;
            leftover -= 1;
        }
        if armies == 0 {
            break;
        }
        plan.place(region, armies)?;
    }
    Ok(())
}
