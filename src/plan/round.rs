//! The round orchestrator.
//!
//! Placement phase, in order:
//!
//! 1. rank attack targets and update the extra effort of each;
//! 2. run the defensive pass on contested super-regions;
//! 3. for each target not already counter-attacked, recruit on the strongest
//!    owned neighbor until it can afford the worst-case force, then commit
//!    the attack;
//! 4. spread the rest of the pool across the border.
//!
//! Attacks decided during placement are held back and emitted in the
//! attack/transfer phase together with the transfers of interior reserves.

use std::cmp::Reverse;
use std::collections::HashMap;

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::{debug, error, info, warn};

use super::defense::{defensive_pass, distribute_remaining};
use super::{Deadline, PlanError, RoundConfig};
use crate::board::{Board, Move, RegionId};
use crate::config::EngineConfig;
use crate::eval::{CombatTables, DominatorLimits};
use crate::movegen::{distance_to_border, distance_to_enemy, plan_transfers};
use crate::rank::{rank_attack_targets, rank_starting_regions, rank_super_regions, RankingConfig};
use crate::state::{GameState, Players};

/// Moves and provisional board of the round being planned.
#[derive(Debug)]
pub struct RoundPlan<'a> {
    pub players: &'a Players,
    /// Scratch copy of the visible board carrying the provisional counts.
    pub board: Board,
    /// Reinforcements still unplaced.
    pub pool: u32,
    pub placements: Vec<Move>,
    pub attacks: Vec<Move>,
}

impl<'a> RoundPlan<'a> {
    pub fn new(players: &'a Players, board: Board, pool: u32) -> Self {
        RoundPlan {
            players,
            board,
            pool,
            placements: Vec::new(),
            attacks: Vec::new(),
        }
    }

    /// Current armies on a region of the scratch board.
    pub fn armies(&self, region: RegionId) -> Result<u32, PlanError> {
        self.board
            .region(region)
            .map(|r| r.armies)
            .ok_or(PlanError::UnknownRegion(region))
    }

    /// Places `armies` from the pool on a region. Callers keep `armies`
    /// within the pool.
    pub fn place(&mut self, region: RegionId, armies: u32) -> Result<(), PlanError> {
        if armies == 0 {
            return Ok(());
        }
        let r = self
            .board
            .region_mut(region)
            .ok_or(PlanError::UnknownRegion(region))?;
        r.armies += armies;
        self.pool = self.pool.saturating_sub(armies);
        self.placements.push(Move::place(&self.players.me, region, armies));
        Ok(())
    }

    /// Commits an attack, taking the armies off the source. Callers keep at
    /// least one army behind.
    pub fn attack(&mut self, from: RegionId, to: RegionId, armies: u32) -> Result<(), PlanError> {
        if armies == 0 {
            return Ok(());
        }
        let r = self
            .board
            .region_mut(from)
            .ok_or(PlanError::UnknownRegion(from))?;
        r.armies = r.armies.saturating_sub(armies);
        self.attacks.push(Move::attack(&self.players.me, from, to, armies));
        Ok(())
    }

    /// Returns true if an attack on the region is already planned.
    pub fn is_targeted(&self, region: RegionId) -> bool {
        self.attacks.iter().any(|m| m.target() == Some(region))
    }
}

/// Decides the moves of every phase and remembers what it did last round.
#[derive(Debug)]
pub struct Strategist {
    round: RoundConfig,
    ranking: RankingConfig,
    limits: DominatorLimits,
    tables: CombatTables,
    /// Extra force per target that survived our last attack.
    extra_effort: HashMap<RegionId, u32>,
    /// Targets of the attacks emitted last round.
    last_targets: Vec<RegionId>,
    /// Attacks decided during placement, emitted in the attack phase.
    pending: Vec<Move>,
    rng: SmallRng,
}

impl Strategist {
    /// Builds the combat tables eagerly and seeds the fallback RNG.
    pub fn new(config: &EngineConfig) -> Self {
        let rng = if config.seed == 0 {
            SmallRng::from_entropy()
        } else {
            SmallRng::seed_from_u64(config.seed)
        };
        Strategist {
            round: config.round,
            ranking: config.ranking,
            limits: config.dominators,
            tables: CombatTables::new(&config.combat),
            extra_effort: HashMap::new(),
            last_targets: Vec::new(),
            pending: Vec::new(),
            rng,
        }
    }

    pub fn round_config(&self) -> &RoundConfig {
        &self.round
    }

    pub fn tables(&self) -> &CombatTables {
        &self.tables
    }

    /// Extra force currently demanded for a target.
    pub fn extra_effort(&self, region: RegionId) -> u32 {
        self.extra_effort.get(&region).copied().unwrap_or(0)
    }

    /// Chooses a starting region among `pickable`.
    ///
    /// The region whose super-region ranks best wins; regions of the same
    /// super-region are ordered by how fast the super-region can be taken.
    /// Falls back to a random pick when nothing can be ranked or the budget
    /// runs out before the per-region estimates.
    pub fn pick_starting_region(
        &mut self,
        state: &GameState,
        pickable: &[RegionId],
        deadline: &Deadline,
    ) -> Option<RegionId> {
        let full = state.full_board();
        let ranking = rank_super_regions(full, None, state.players(), &self.ranking);
        if deadline.should_stop() {
            let id = pickable.choose(&mut self.rng).copied();
            warn!(region = ?id, "round budget spent, picking at random");
            return id;
        }
        let by_speed = rank_starting_regions(
            full,
            pickable,
            &self.tables,
            &self.ranking,
            self.round.starting_armies_per_turn,
        );

        let best = by_speed
            .iter()
            .enumerate()
            .filter_map(|(speed, &id)| {
                let sr = full.region(id)?.super_region;
                Some((ranking.position(sr)?, speed, id))
            })
            .min()
            .map(|(_, _, id)| id);

        match best {
            Some(id) => {
                info!(region = %id, "picked starting region");
                Some(id)
            }
            None => {
                let id = pickable.choose(&mut self.rng).copied();
                warn!(region = ?id, "no ranked starting region, picking at random");
                id
            }
        }
    }

    /// Plans the placement phase and the attacks that go with it.
    ///
    /// On success the scratch board replaces the visible board. On failure
    /// the error is logged, the phase yields no moves, and the visible board
    /// is left untouched.
    pub fn place_armies(&mut self, state: &mut GameState, deadline: &Deadline) -> Vec<Move> {
        info!(round = state.round(), pool = state.starting_armies(), "planning placements");
        self.pending.clear();

        match self.plan_round(state, deadline) {
            Ok((board, placements, attacks)) => {
                state.replace_visible(board);
                self.last_targets = attacks.iter().filter_map(Move::target).collect();
                self.pending = attacks;
                debug!(
                    placements = placements.len(),
                    attacks = self.pending.len(),
                    elapsed_ms = deadline.elapsed().as_millis() as u64,
                    "placement phase planned"
                );
                placements
            }
            Err(e) => {
                error!(error = %e, "placement planning failed");
                self.last_targets.clear();
                Vec::new()
            }
        }
    }

    /// Emits the attacks planned during placement followed by transfers of
    /// interior reserves toward the front.
    pub fn attack_transfer(&mut self, state: &GameState, deadline: &Deadline) -> Vec<Move> {
        let mut moves = std::mem::take(&mut self.pending);

        let players = state.players();
        let Some(visible) = state.visible_board() else {
            warn!(error = %PlanError::NoVisibleBoard, "skipping transfers");
            return moves;
        };
        if players.me.is_empty() {
            warn!(error = %PlanError::MissingPlayers, "skipping transfers");
            return moves;
        }
        if deadline.should_stop() {
            warn!("round budget spent, skipping transfers");
            return moves;
        }

        let enemy = distance_to_enemy(visible, players);
        let border = distance_to_border(visible, players);
        let transfers = plan_transfers(visible, players, &enemy, &border);
        info!(attacks = moves.len(), transfers = transfers.len(), "attack/transfer phase planned");
        moves.extend(transfers);
        moves
    }

    fn plan_round(
        &mut self,
        state: &GameState,
        deadline: &Deadline,
    ) -> Result<(Board, Vec<Move>, Vec<Move>), PlanError> {
        let players = state.players();
        if players.me.is_empty() || players.opponent.is_empty() {
            return Err(PlanError::MissingPlayers);
        }
        let visible = state.visible_board().ok_or(PlanError::NoVisibleBoard)?;
        let full = state.full_board();

        let ranking = rank_super_regions(full, Some(visible), players, &self.ranking);
        let targets = rank_attack_targets(full, visible, &ranking, players, &self.ranking, &self.limits);
        self.update_extra_effort(&targets);

        let mut plan = RoundPlan::new(players, visible.clone(), state.starting_armies());
        if !deadline.should_stop() {
            defensive_pass(&mut plan, &self.round, deadline)?;
        }

        for &target in &targets {
            if deadline.should_stop() {
                warn!(target = %target, "round budget spent, no further targets");
                break;
            }
            if deadline.expired() {
                debug!("round budget spent, planning on");
            }
            if plan.is_targeted(target) {
                debug!(target = %target, "already counter-attacked");
                continue;
            }
            self.attack_target(&mut plan, target)?;
        }
        distribute_remaining(&mut plan)?;

        Ok((plan.board, plan.placements, plan.attacks))
    }

    /// Escalates targets attacked last round and resets the others.
    fn update_extra_effort(&mut self, targets: &[RegionId]) {
        let step = self.round.extra_effort_step;
        let mut next = HashMap::with_capacity(targets.len());
        for &t in targets {
            let effort = if self.last_targets.contains(&t) {
                self.extra_effort(t) + step
            } else {
                0
            };
            if effort > 0 {
                debug!(region = %t, effort, "extra effort");
            }
            next.insert(t, effort);
        }
        self.extra_effort = next;
    }

    /// Recruits for and attacks one ranked target.
    fn attack_target(&self, plan: &mut RoundPlan<'_>, target: RegionId) -> Result<(), PlanError> {
        let Some(defenders) = plan.board.region(target).map(|r| r.armies) else {
            warn!(target = %target, "target left the visible board");
            return Ok(());
        };
        let base = match self.tables.units_to_attack(defenders) {
            Ok(n) => n,
            Err(e) => {
                warn!(target = %target, error = %e, "skipping target");
                return Ok(());
            }
        };
        let required = (base + self.extra_effort(target)).max(1);

        let me = &plan.players.me;
        let Some(source) = plan
            .board
            .neighbors(target)
            .filter(|n| n.owned_by(me))
            .max_by_key(|n| (n.armies, Reverse(n.id)))
            .map(|n| n.id)
        else {
            warn!(target = %target, "no owned region borders target");
            return Ok(());
        };

        let armies = plan.armies(source)?;
        if plan.pool > 0 && armies <= required {
            let recruit = (required - armies + 1).min(plan.pool);
            info!(region = %source, recruit, target = %target, "recruiting to attack");
            plan.place(source, recruit)?;
        }

        if plan.armies(source)? > required {
            info!(from = %source, to = %target, armies = required, "attacking");
            plan.attack(source, target, required)?;
        }
        Ok(())
    }
}
