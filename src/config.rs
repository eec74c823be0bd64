//! Engine configuration.
//!
//! Every tunable of the bot lives in one [`EngineConfig`], read from a JSON
//! file. Missing fields and missing sections take their defaults, so an
//! empty object is a valid configuration.
//!
//! ```json
//! {
//!   "combat": { "defense_kill_rate": 0.6, "luck_factor": 0.16 },
//!   "round": { "max_round_ms": 300, "deadline_policy": "advisory" },
//!   "seed": 42
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::eval::{CombatConfig, DominatorLimits};
use crate::plan::RoundConfig;
use crate::rank::RankingConfig;

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "HEGEMON_CONFIG";

/// Errors raised while loading or validating the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub combat: CombatConfig,
    pub ranking: RankingConfig,
    pub dominators: DominatorLimits,
    pub round: RoundConfig,
    /// Seed of the random starting-pick fallback; 0 seeds from entropy.
    pub seed: u64,
}

impl EngineConfig {
    /// Reads and validates a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parses and validates a JSON config document.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit = |field, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(invalid(field, format!("{} is outside [0, 1]", v)))
            }
        };
        unit("combat.defense_kill_rate", self.combat.defense_kill_rate)?;
        unit("combat.luck_factor", self.combat.luck_factor)?;
        if self.combat.defense_kill_rate * (1.0 - self.combat.luck_factor) <= 0.0 {
            return Err(invalid("combat", "worst-case kill rate must be positive".into()));
        }
        if self.combat.table_size == 0 {
            return Err(invalid("combat.table_size", "must be at least 1".into()));
        }
        if !(self.ranking.enemy_ownership_factor >= 0.0) {
            return Err(invalid(
                "ranking.enemy_ownership_factor",
                "must be non-negative".into(),
            ));
        }
        if self.dominators.max_search_nodes == 0 {
            return Err(invalid("dominators.max_search_nodes", "must be at least 1".into()));
        }
        if !(self.round.defensive_hold_factor > 0.0) {
            return Err(invalid("round.defensive_hold_factor", "must be positive".into()));
        }
        if !(self.round.counter_attack_factor > 0.0) {
            return Err(invalid("round.counter_attack_factor", "must be positive".into()));
        }
        if self.round.starting_armies_per_turn == 0 {
            return Err(invalid("round.starting_armies_per_turn", "must be at least 1".into()));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: String) -> ConfigError {
    ConfigError::Invalid { field, reason }
}
