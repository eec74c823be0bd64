//! Round planning.
//!
//! The [`Strategist`] turns a game state into the moves of one round: the
//! starting pick, the army placements, and the attacks and transfers. All
//! provisional army changes are made on a scratch copy of the visible board
//! that is committed only when planning succeeds.

pub mod defense;
pub mod round;

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::board::RegionId;

pub use round::Strategist;

/// Errors that abort the planning of a whole phase.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("no visible board: update_map has not been received")]
    NoVisibleBoard,

    #[error("player names are not configured")]
    MissingPlayers,

    #[error("planned move references region {0} missing from the visible board")]
    UnknownRegion(RegionId),
}

/// What happens when a round runs past its time budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DeadlinePolicy {
    /// Stop taking new targets; keep the moves committed so far.
    #[default]
    Enforced,
    /// Log the overrun and keep planning.
    Advisory,
}

/// Tunables of the round orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoundConfig {
    /// Added to a target's required force each round it survives our attack.
    pub extra_effort_step: u32,
    /// Enemy stack divided by this is what a border region must hold.
    pub defensive_hold_factor: f64,
    /// Enemy stack multiplied by this is what a counter-attack sends.
    pub counter_attack_factor: f64,
    /// Reinforcements assumed per round when estimating starting regions.
    pub starting_armies_per_turn: u32,
    /// Upper bound on the time spent planning one phase.
    pub max_round_ms: u64,
    pub deadline_policy: DeadlinePolicy,
}

impl Default for RoundConfig {
    fn default() -> Self {
        RoundConfig {
            extra_effort_step: 3,
            defensive_hold_factor: 1.3,
            counter_attack_factor: 2.0,
            starting_armies_per_turn: 5,
            max_round_ms: 400,
            deadline_policy: DeadlinePolicy::Enforced,
        }
    }
}

/// Time budget of one planning phase.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
    policy: DeadlinePolicy,
}

impl Deadline {
    /// Budget of `timeout_ms` as sent by the server, capped by the configured
    /// maximum. A zero timeout means the server gave none.
    pub fn new(timeout_ms: u64, config: &RoundConfig) -> Self {
        let ms = if timeout_ms == 0 {
            config.max_round_ms
        } else {
            timeout_ms.min(config.max_round_ms)
        };
        Deadline {
            start: Instant::now(),
            budget: Duration::from_millis(ms),
            policy: config.deadline_policy,
        }
    }

    /// A deadline that never expires.
    pub fn unbounded() -> Self {
        Deadline {
            start: Instant::now(),
            budget: Duration::MAX,
            policy: DeadlinePolicy::Advisory,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn expired(&self) -> bool {
        self.elapsed() >= self.budget
    }

    /// True once the budget is spent and the policy says to stop.
    pub fn should_stop(&self) -> bool {
        self.policy == DeadlinePolicy::Enforced && self.expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_capped_by_config() {
        let config = RoundConfig::default();
        let d = Deadline::new(10_000, &config);
        assert_eq!(d.budget, Duration::from_millis(400));
        let d = Deadline::new(50, &config);
        assert_eq!(d.budget, Duration::from_millis(50));
        let d = Deadline::new(0, &config);
        assert_eq!(d.budget, Duration::from_millis(400));
    }

    #[test]
    fn zero_budget_stops_only_when_enforced() {
        let mut config = RoundConfig {
            max_round_ms: 0,
            ..RoundConfig::default()
        };
        let d = Deadline::new(0, &config);
        assert!(d.expired());
        assert!(d.should_stop());

        config.deadline_policy = DeadlinePolicy::Advisory;
        let d = Deadline::new(0, &config);
        assert!(d.expired());
        assert!(!d.should_stop());
    }

    #[test]
    fn unbounded_never_expires() {
        let d = Deadline::unbounded();
        assert!(!d.expired());
        assert!(!d.should_stop());
    }

    #[test]
    fn policy_parses_lowercase() {
        let p: DeadlinePolicy = serde_json::from_str("\"advisory\"").unwrap();
        assert_eq!(p, DeadlinePolicy::Advisory);
    }
}
