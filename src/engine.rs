//! Engine state management.
//!
//! Holds the game state and the strategist, dispatches parsed server
//! commands, and writes the bot's answers to the output sink.

use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::board::{BoardError, RegionId};
use crate::config::EngineConfig;
use crate::plan::{Deadline, Strategist};
use crate::protocol::{format_moves, parse_command, Command, ProtocolError, NO_MOVES};
use crate::state::GameState;

/// Holds the mutable state of the bot between commands.
pub struct Engine {
    config: EngineConfig,
    state: GameState,
    strategist: Strategist,
    /// Whether the dominator caches match the current topology.
    warmed: bool,
}

impl Engine {
    /// Creates an engine with an empty map.
    pub fn new(config: EngineConfig) -> Self {
        let strategist = Strategist::new(&config);
        Engine {
            config,
            state: GameState::new(),
            strategist,
            warmed: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Parses and handles one input line. Malformed lines are logged and
    /// skipped; only output failures are returned.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<()> {
        match parse_command(line) {
            Ok(cmd) => self.handle_command(cmd, out),
            Err(ProtocolError::EmptyLine) => Ok(()),
            Err(e) => {
                warn!(error = %e, line, "unable to parse line");
                Ok(())
            }
        }
    }

    /// Applies a command to the state, answering requests on `out`.
    pub fn handle_command<W: Write>(&mut self, cmd: Command, out: &mut W) -> io::Result<()> {
        match cmd {
            Command::Settings(setting) => {
                self.state.apply_setting(setting);
                Ok(())
            }
            Command::SetupSuperRegions(entries) => {
                let result = self.state.setup_super_regions(&entries);
                self.after_setup("super_regions", result);
                Ok(())
            }
            Command::SetupRegions(entries) => {
                let result = self.state.setup_regions(&entries);
                self.after_setup("regions", result);
                Ok(())
            }
            Command::SetupNeighbors(entries) => {
                let result = self.state.setup_neighbors(&entries);
                self.after_setup("neighbors", result);
                Ok(())
            }
            Command::SetupWastelands(regions) => {
                let result = self.state.setup_wastelands(&regions);
                self.after_setup("wastelands", result);
                Ok(())
            }
            Command::UpdateMap(updates) => {
                self.state.update_map(&updates);
                Ok(())
            }
            Command::OpponentMoves(moves) => {
                self.state.set_opponent_moves(moves);
                Ok(())
            }
            Command::PickStartingRegion { timeout_ms, regions } => {
                self.handle_pick(timeout_ms, regions, out)
            }
            Command::GoPlaceArmies { timeout_ms } => {
                self.warm();
                let deadline = Deadline::new(timeout_ms, self.strategist.round_config());
                let moves = self.strategist.place_armies(&mut self.state, &deadline);
                writeln!(out, "{}", format_moves(&moves))?;
                out.flush()
            }
            Command::GoAttackTransfer { timeout_ms } => {
                let deadline = Deadline::new(timeout_ms, self.strategist.round_config());
                let moves = self.strategist.attack_transfer(&self.state, &deadline);
                info!(round = self.state.round(), "round done");
                writeln!(out, "{}", format_moves(&moves))?;
                out.flush()
            }
        }
    }

    fn handle_pick<W: Write>(
        &mut self,
        timeout_ms: u64,
        regions: Vec<RegionId>,
        out: &mut W,
    ) -> io::Result<()> {
        self.warm();
        self.state.set_pickable(regions);
        let deadline = Deadline::new(timeout_ms, self.strategist.round_config());
        let pick = self
            .strategist
            .pick_starting_region(&self.state, self.state.pickable(), &deadline);
        debug!(elapsed_ms = deadline.elapsed().as_millis() as u64, "starting pick");
        match pick {
            Some(region) => writeln!(out, "{}", region)?,
            None => {
                warn!("no pickable starting region");
                writeln!(out, "{}", NO_MOVES)?;
            }
        }
        out.flush()
    }

    /// Logs setup failures and marks the dominator caches stale.
    fn after_setup(&mut self, section: &str, result: Result<(), BoardError>) {
        self.warmed = false;
        match result {
            Ok(()) => debug!(section, "map setup"),
            Err(e) => warn!(section, error = %e, "map setup failed"),
        }
    }

    /// Computes every dominator cache once the topology is final.
    fn warm(&mut self) {
        if self.warmed {
            return;
        }
        let board = self.state.full_board();
        board.warm_dominators(&self.config.dominators);
        info!(
            regions = board.region_count(),
            super_regions = board.super_regions().count(),
            "dominator caches ready"
        );
        self.warmed = true;
    }
}
