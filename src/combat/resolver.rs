//! Dice combat between two strength pools
//!
//! Each side fields up to its unit cap, every unit rolls one die over
//! `0..=die_sides`, rolls are sorted descending and compared pairwise.
//! The higher roll of a pair costs the other side one point of strength;
//! a tie goes to the defender. Unpaired rolls do nothing.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::GameConfig;

/// Combat tuning taken from the game config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatRules {
    pub max_defenders: u32,
    pub max_attackers: u32,
    pub die_sides: u32,
}

impl CombatRules {
    pub fn new(max_defenders: u32, max_attackers: u32, die_sides: u32) -> Self {
        Self {
            max_defenders,
            max_attackers,
            die_sides,
        }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.max_defenders, config.max_attackers, config.die_sides)
    }
}

impl Default for CombatRules {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

/// Full record of one clash
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    /// Sorted descending
    pub defender_rolls: Vec<u32>,
    /// Sorted descending
    pub attacker_rolls: Vec<u32>,
    pub defender_losses: u32,
    pub attacker_losses: u32,
    pub defender_strength: u32,
    pub attacker_strength: u32,
}

impl CombatOutcome {
    pub fn defender_defeated(&self) -> bool {
        self.defender_strength == 0
    }

    pub fn attacker_defeated(&self) -> bool {
        self.attacker_strength == 0
    }
}

fn roll_units<R: Rng + ?Sized>(units: u32, die_sides: u32, rng: &mut R) -> Vec<u32> {
    let mut rolls: Vec<u32> = (0..units).map(|_| rng.gen_range(0..=die_sides)).collect();
    rolls.sort_unstable_by(|a, b| b.cmp(a));
    rolls
}

/// Resolve one clash and keep the dice.
///
/// Defender dice are drawn before attacker dice.
pub fn resolve_detailed<R: Rng + ?Sized>(
    defender_strength: u32,
    attacker_strength: u32,
    rules: &CombatRules,
    rng: &mut R,
) -> CombatOutcome {
    let defender_units = defender_strength.min(rules.max_defenders);
    let attacker_units = attacker_strength.min(rules.max_attackers);

    let defender_rolls = roll_units(defender_units, rules.die_sides, rng);
    let attacker_rolls = roll_units(attacker_units, rules.die_sides, rng);

    let (mut defender_losses, mut attacker_losses) = (0u32, 0u32);
    for (def, atk) in defender_rolls.iter().zip(attacker_rolls.iter()) {
        if atk > def {
            defender_losses += 1;
        } else {
            attacker_losses += 1;
        }
    }

    let outcome = CombatOutcome {
        defender_strength: defender_strength.saturating_sub(defender_losses),
        attacker_strength: attacker_strength.saturating_sub(attacker_losses),
        defender_rolls,
        attacker_rolls,
        defender_losses,
        attacker_losses,
    };

    tracing::debug!(
        "Clash {}v{}: defender {:?} attacker {:?} -> {}v{}",
        defender_strength,
        attacker_strength,
        outcome.defender_rolls,
        outcome.attacker_rolls,
        outcome.defender_strength,
        outcome.attacker_strength
    );
    outcome
}

/// Resolve one clash, returning `(new_defender_strength, new_attacker_strength)`
pub fn resolve<R: Rng + ?Sized>(
    defender_strength: u32,
    attacker_strength: u32,
    max_defenders: u32,
    max_attackers: u32,
    die_sides: u32,
    rng: &mut R,
) -> (u32, u32) {
    let rules = CombatRules::new(max_defenders, max_attackers, die_sides);
    let outcome = resolve_detailed(defender_strength, attacker_strength, &rules, rng);
    (outcome.defender_strength, outcome.attacker_strength)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;

    #[test]
    fn test_losses_bounded_by_pairs() {
        let mut rng = GameRng::new(11);
        let rules = CombatRules::new(2, 3, 6);
        for _ in 0..200 {
            let outcome = resolve_detailed(5, 7, &rules, &mut rng);
            assert_eq!(outcome.defender_rolls.len(), 2);
            assert_eq!(outcome.attacker_rolls.len(), 3);
            assert_eq!(outcome.defender_losses + outcome.attacker_losses, 2);
            assert_eq!(outcome.defender_strength, 5 - outcome.defender_losses);
            assert_eq!(outcome.attacker_strength, 7 - outcome.attacker_losses);
        }
    }

    #[test]
    fn test_rolls_sorted_and_in_range() {
        let mut rng = GameRng::new(3);
        let rules = CombatRules::new(4, 4, 6);
        for _ in 0..100 {
            let outcome = resolve_detailed(10, 10, &rules, &mut rng);
            for rolls in [&outcome.defender_rolls, &outcome.attacker_rolls] {
                assert!(rolls.windows(2).all(|w| w[0] >= w[1]));
                assert!(rolls.iter().all(|r| *r <= 6));
            }
        }
    }

    #[test]
    fn test_tie_favours_defender() {
        // Single-sided die: every roll is 0 or 1, ties are common
        let mut rng = GameRng::new(5);
        let rules = CombatRules::new(1, 1, 1);
        for _ in 0..200 {
            let outcome = resolve_detailed(3, 3, &rules, &mut rng);
            let (def, atk) = (outcome.defender_rolls[0], outcome.attacker_rolls[0]);
            if atk > def {
                assert_eq!(outcome.defender_losses, 1);
            } else {
                assert_eq!(outcome.attacker_losses, 1);
            }
        }
    }

    #[test]
    fn test_zero_strength_side_fields_no_units() {
        let mut rng = GameRng::new(1);
        assert_eq!(resolve(0, 5, 2, 2, 6, &mut rng), (0, 5));
        assert_eq!(resolve(4, 0, 2, 2, 6, &mut rng), (4, 0));
    }

    #[test]
    fn test_same_seed_same_result() {
        let mut a = GameRng::new(77);
        let mut b = GameRng::new(77);
        for _ in 0..50 {
            assert_eq!(resolve(6, 6, 2, 2, 6, &mut a), resolve(6, 6, 2, 2, 6, &mut b));
        }
    }

    #[test]
    fn test_outcome_flags() {
        let mut rng = GameRng::new(8);
        let rules = CombatRules::new(2, 2, 6);
        let outcome = resolve_detailed(1, 0, &rules, &mut rng);
        assert!(outcome.attacker_defeated());
        assert!(!outcome.defender_defeated());
    }
}
