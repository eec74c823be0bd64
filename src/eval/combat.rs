//! Worst-case combat lookup tables.
//!
//! Each attacking army destroys a defender with probability
//! `defense_kill_rate`; luck can swing the outcome by `luck_factor`. The
//! tables assume the attacker is as unlucky as possible:
//!
//! `kills(n) = round(n * defense_kill_rate * (1 - luck_factor))`
//!
//! `units_to_defend` is that function over attacker counts and
//! `units_to_attack` is its inverse: the smallest attacker count whose
//! worst case still destroys the given number of defenders.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by combat lookups outside the built range.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("{defenders} defenders exceed the attack table (max {max})")]
    DefendersOutOfRange { defenders: u32, max: u32 },

    #[error("{attackers} attackers exceed the defense table (max {max})")]
    AttackersOutOfRange { attackers: u32, max: u32 },
}

/// Constants the tables are built from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Fraction of defending armies each attacking army destroys.
    pub defense_kill_rate: f64,
    /// Maximum fraction by which luck reduces the kill count.
    pub luck_factor: f64,
    /// Attacker counts `0..table_size` are tabulated.
    pub table_size: u32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        CombatConfig {
            defense_kill_rate: 0.6,
            luck_factor: 0.16,
            table_size: 1000,
        }
    }
}

/// Immutable attack/defense requirement tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombatTables {
    /// Indexed by attacker count: worst-case defenders destroyed.
    defend: Vec<u32>,
    /// Indexed by defender count: attackers needed to destroy them all.
    attack: Vec<u32>,
}

impl CombatTables {
    /// Builds both tables from the given constants.
    pub fn new(config: &CombatConfig) -> Self {
        let rate = config.defense_kill_rate * (1.0 - config.luck_factor);
        let defend: Vec<u32> = (0..config.table_size.max(1))
            .map(|n| (n as f64 * rate).round().max(0.0) as u32)
            .collect();

        // `defend` is non-decreasing, so a single forward scan finds the
        // smallest attacker count reaching every kill value.
        let max_kill = defend.last().copied().unwrap_or(0);
        let mut attack = Vec::with_capacity(max_kill as usize + 1);
        let mut n = 0usize;
        for d in 0..=max_kill {
            while defend[n] < d {
                n += 1;
            }
            attack.push(n as u32);
        }

        // The generic inversion lets a single attacker "take" a 1-army
        // region; two are needed to be sure.
        if let Some(one) = attack.get_mut(1) {
            *one = (*one).max(2);
        }

        CombatTables { defend, attack }
    }

    /// Attackers required to destroy `defenders` armies in the worst case.
    pub fn units_to_attack(&self, defenders: u32) -> Result<u32, CombatError> {
        self.attack
            .get(defenders as usize)
            .copied()
            .ok_or(CombatError::DefendersOutOfRange {
                defenders,
                max: self.max_defenders(),
            })
    }

    /// Defenders destroyed by `attackers` armies in the worst case.
    pub fn units_to_defend(&self, attackers: u32) -> Result<u32, CombatError> {
        self.defend
            .get(attackers as usize)
            .copied()
            .ok_or(CombatError::AttackersOutOfRange {
                attackers,
                max: self.max_attackers(),
            })
    }

    /// Largest defender count the attack table covers.
    pub fn max_defenders(&self) -> u32 {
        self.attack.len().saturating_sub(1) as u32
    }

    /// Largest attacker count the defense table covers.
    pub fn max_attackers(&self) -> u32 {
        self.defend.len().saturating_sub(1) as u32
    }
}

impl Default for CombatTables {
    fn default() -> Self {
        CombatTables::new(&CombatConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn one_defender_needs_two_attackers() {
        let tables = CombatTables::default();
        assert_eq!(tables.units_to_attack(1), Ok(2));
    }

    #[test]
    fn known_values_with_default_constants() {
        let tables = CombatTables::default();
        assert_eq!(tables.units_to_attack(0), Ok(0));
        assert_eq!(tables.units_to_attack(2), Ok(3));
        assert_eq!(tables.units_to_attack(3), Ok(5));
        assert_eq!(tables.units_to_attack(10), Ok(19));
        assert_eq!(tables.units_to_defend(5), Ok(3));
        assert_eq!(tables.units_to_defend(0), Ok(0));
    }

    #[test]
    fn attack_table_is_monotonic() {
        let tables = CombatTables::default();
        let mut prev = 0;
        for d in 0..=tables.max_defenders() {
            let n = tables.units_to_attack(d).unwrap();
            assert!(n >= prev, "units_to_attack({}) = {} < {}", d, n, prev);
            prev = n;
        }
    }

    #[test]
    fn required_attackers_destroy_the_defenders() {
        let tables = CombatTables::default();
        for d in 0..=tables.max_defenders().min(999) {
            let n = tables.units_to_attack(d).unwrap();
            let kills = tables.units_to_defend(n).unwrap();
            assert!(kills >= d, "{} attackers kill {} < {}", n, kills, d);
        }
    }

    #[test]
    fn out_of_range_lookups_are_rejected() {
        let tables = CombatTables::default();
        let max = tables.max_defenders();
        assert_eq!(
            tables.units_to_attack(max + 1),
            Err(CombatError::DefendersOutOfRange { defenders: max + 1, max })
        );
        assert_eq!(
            tables.units_to_defend(1000),
            Err(CombatError::AttackersOutOfRange { attackers: 1000, max: 999 })
        );
    }

    #[test]
    fn high_kill_rate_fills_gaps_with_next_attacker_count() {
        // Rate 1.5 skips odd kill values; the smallest attacker count still
        // reaching them must be used.
        let tables = CombatTables::new(&CombatConfig {
            defense_kill_rate: 1.5,
            luck_factor: 0.0,
            table_size: 10,
        });
        // kills: 0, 2 (1.5 rounds up), 3, 5 (4.5 rounds up), 6, ...
        assert_eq!(tables.units_to_attack(3), Ok(2));
        assert_eq!(tables.units_to_attack(4), Ok(3));
        assert_eq!(tables.units_to_attack(1), Ok(2));
    }

    #[test]
    fn zero_kill_rate_only_covers_empty_regions() {
        let tables = CombatTables::new(&CombatConfig {
            defense_kill_rate: 0.0,
            luck_factor: 0.16,
            table_size: 100,
        });
        assert_eq!(tables.max_defenders(), 0);
        assert_eq!(tables.units_to_attack(0), Ok(0));
        assert!(tables.units_to_attack(1).is_err());
    }

    proptest! {
        #[test]
        fn prop_attack_requirement_monotonic(rate in 0.05f64..1.0, luck in 0.0f64..0.5) {
            let tables = CombatTables::new(&CombatConfig {
                defense_kill_rate: rate,
                luck_factor: luck,
                table_size: 300,
            });
            let mut prev = 0;
            for d in 0..=tables.max_defenders() {
                let n = tables.units_to_attack(d).unwrap();
                prop_assert!(n >= prev);
                prop_assert!(tables.units_to_defend(n).unwrap() >= d);
                prev = n;
            }
        }
    }
}
