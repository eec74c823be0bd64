//! Game state accumulated from the server.
//!
//! Holds the settings, the full board built during setup, the visible board
//! rebuilt every round, and the opponent's moves from the last round.

use tracing::{debug, info, warn};

use crate::board::{Board, BoardError, Move, RegionId, RegionUpdate, SuperRegionId};

/// The two sides the engine reasons about.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Players {
    pub me: String,
    pub opponent: String,
}

impl Players {
    pub fn new(me: &str, opponent: &str) -> Self {
        Players {
            me: me.to_string(),
            opponent: opponent.to_string(),
        }
    }
}

/// A `settings` line from the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    YourBot(String),
    OpponentBot(String),
    MaxRounds(u32),
    /// Total timebank in milliseconds.
    Timebank(u64),
    /// Milliseconds added to the timebank per request.
    TimePerMove(u64),
    /// Reinforcements for the coming round; also marks a new round.
    StartingArmies(u32),
    StartingRegions(Vec<RegionId>),
    StartingPickAmount(u32),
}

/// Everything known about the match so far.
#[derive(Debug, Clone, Default)]
pub struct GameState {
    players: Players,
    max_rounds: u32,
    timebank_ms: u64,
    time_per_move_ms: u64,
    starting_armies: u32,
    starting_pick_amount: u32,
    round: u32,
    full: Board,
    visible: Option<Board>,
    pickable: Vec<RegionId>,
    wastelands: Vec<RegionId>,
    opponent_moves: Vec<Move>,
}

impl GameState {
    pub fn new() -> Self {
        GameState::default()
    }

    /// Applies a single `settings` line.
    pub fn apply_setting(&mut self, setting: Setting) {
        match setting {
            Setting::YourBot(name) => self.players.me = name,
            Setting::OpponentBot(name) => self.players.opponent = name,
            Setting::MaxRounds(n) => self.max_rounds = n,
            Setting::Timebank(ms) => self.timebank_ms = ms,
            Setting::TimePerMove(ms) => self.time_per_move_ms = ms,
            Setting::StartingArmies(n) => {
                self.starting_armies = n;
                self.round += 1;
                debug!(round = self.round, armies = n, "new round");
            }
            Setting::StartingRegions(regions) => self.set_pickable(regions),
            Setting::StartingPickAmount(n) => self.starting_pick_amount = n,
        }
    }

    pub fn setup_super_regions(&mut self, entries: &[(SuperRegionId, u32)]) -> Result<(), BoardError> {
        for &(id, reward) in entries {
            self.full.add_super_region(id, reward)?;
        }
        Ok(())
    }

    pub fn setup_regions(&mut self, entries: &[(RegionId, SuperRegionId)]) -> Result<(), BoardError> {
        for &(id, sr) in entries {
            self.full.add_region(id, sr)?;
        }
        Ok(())
    }

    pub fn setup_neighbors(&mut self, entries: &[(RegionId, Vec<RegionId>)]) -> Result<(), BoardError> {
        for (id, neighbors) in entries {
            for &n in neighbors {
                self.full.connect(*id, n)?;
            }
        }
        Ok(())
    }

    /// Flags wastelands on the full board so every later copy carries them.
    pub fn setup_wastelands(&mut self, regions: &[RegionId]) -> Result<(), BoardError> {
        for &id in regions {
            self.full.mark_wasteland(id)?;
            if !self.wastelands.contains(&id) {
                self.wastelands.push(id);
            }
        }
        Ok(())
    }

    /// Replaces the pickable starting regions, dropping ids not on the map.
    pub fn set_pickable(&mut self, regions: Vec<RegionId>) {
        self.pickable = regions
            .into_iter()
            .filter(|id| {
                let known = self.full.region(*id).is_some();
                if !known {
                    warn!(region = %id, "pickable region not on the map");
                }
                known
            })
            .collect();
    }

    /// Rebuilds the visible board from this round's observations.
    pub fn update_map(&mut self, updates: &[RegionUpdate]) {
        self.visible = Some(self.full.visible_copy(updates));
    }

    /// Stores the opponent's moves from the last round, replacing older ones.
    pub fn set_opponent_moves(&mut self, moves: Vec<Move>) {
        let placed: u32 = moves
            .iter()
            .filter(|m| m.is_placement())
            .map(Move::armies)
            .sum();
        if !moves.is_empty() {
            info!(moves = moves.len(), placed, "opponent moves observed");
        }
        self.opponent_moves = moves;
    }

    pub fn players(&self) -> &Players {
        &self.players
    }

    pub fn full_board(&self) -> &Board {
        &self.full
    }

    pub fn visible_board(&self) -> Option<&Board> {
        self.visible.as_ref()
    }

    /// Installs a board produced by planning as the current visible board.
    pub fn replace_visible(&mut self, board: Board) {
        self.visible = Some(board);
    }

    pub fn starting_armies(&self) -> u32 {
        self.starting_armies
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    pub fn timebank_ms(&self) -> u64 {
        self.timebank_ms
    }

    pub fn time_per_move_ms(&self) -> u64 {
        self.time_per_move_ms
    }

    pub fn starting_pick_amount(&self) -> u32 {
        self.starting_pick_amount
    }

    pub fn pickable(&self) -> &[RegionId] {
        &self.pickable
    }

    pub fn wastelands(&self) -> &[RegionId] {
        &self.wastelands
    }

    pub fn opponent_moves(&self) -> &[Move] {
        &self.opponent_moves
    }
}
