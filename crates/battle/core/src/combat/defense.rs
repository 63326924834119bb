//! Layered defense model: dodge, then block, then full damage.
//!
//! Dodging evades everything, including unblockable hits. Blocking stops
//! ordinary hits but is bypassed outright by unblockable ones. The two gates
//! roll independently, and a failed dodge falls through to the block gate.

use super::rng::Roller;
use crate::config::BattleConfig;
use crate::state::{DefensiveGear, DefensiveStance};

/// Result of the block gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockResult {
    /// Blocked; damage reduced to the leaked amount.
    Blocked,
    /// Unblockable hit broke through without a roll.
    Bypassed,
    /// Roll failed; full damage.
    Failed,
}

/// How an incoming hit was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DefenseResolution {
    pub damage: u32,
    /// `Some(true)` on a successful dodge, `Some(false)` on a failed one.
    pub dodge: Option<bool>,
    pub block: Option<BlockResult>,
}

impl DefenseResolution {
    const fn undefended(damage: u32) -> Self {
        Self {
            damage,
            dodge: None,
            block: None,
        }
    }
}

/// Dodge chance for the given gear: `clamp(base + bonus, 0, max)`.
pub fn dodge_chance(gear: &DefensiveGear, config: &BattleConfig) -> f32 {
    (config.base_dodge_chance + gear.dodge_bonus).clamp(0.0, config.max_dodge_chance)
}

/// Resolves `raw` damage against a defender holding `stance`.
///
/// Enemies never hold a stance, so passing [`DefensiveStance::None`] returns
/// `raw` unchanged without consuming any roll.
pub fn resolve_defense(
    stance: DefensiveStance,
    gear: &DefensiveGear,
    raw: u32,
    unblockable: bool,
    config: &BattleConfig,
    rng: &mut dyn Roller,
) -> DefenseResolution {
    let mut resolution = DefenseResolution::undefended(raw);

    if stance == DefensiveStance::Dodging {
        let succeeded = rng.unit() < dodge_chance(gear, config);
        resolution.dodge = Some(succeeded);
        if succeeded {
            resolution.damage = 0;
            return resolution;
        }
    }

    if stance == DefensiveStance::Blocking {
        if unblockable {
            resolution.block = Some(BlockResult::Bypassed);
            return resolution;
        }

        let (chance, leak) = if gear.has_shield {
            (
                config.shield_block_chance,
                config.shield_block_damage_multiplier,
            )
        } else {
            (config.base_block_chance, config.block_damage_multiplier)
        };
        if rng.unit() < chance {
            resolution.block = Some(BlockResult::Blocked);
            resolution.damage = (raw as f32 * leak).ceil().max(0.0) as u32;
        } else {
            resolution.block = Some(BlockResult::Failed);
        }
    }

    resolution
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::rng::{ScriptedRoller, SeededRoller};

    fn gear(dodge_bonus: f32, has_shield: bool) -> DefensiveGear {
        DefensiveGear {
            dodge_bonus,
            has_shield,
        }
    }

    #[test]
    fn dodge_with_gear_bonus_succeeds() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRoller::new([0.50]);
        let r = resolve_defense(
            DefensiveStance::Dodging,
            &gear(0.10, false),
            40,
            false,
            &config,
            &mut rng,
        );
        assert_eq!(r.damage, 0);
        assert_eq!(r.dodge, Some(true));
        assert_eq!(r.block, None);
        assert_eq!(rng.remaining(), 0);
    }

    #[test]
    fn dodge_chance_is_capped() {
        let config = BattleConfig::default();
        assert!((dodge_chance(&gear(0.5, false), &config) - 0.95).abs() < f32::EPSILON);
        let mut rng = ScriptedRoller::new([0.96]);
        let r = resolve_defense(
            DefensiveStance::Dodging,
            &gear(0.5, false),
            40,
            true,
            &config,
            &mut rng,
        );
        assert_eq!(r.dodge, Some(false));
        assert_eq!(r.damage, 40);
    }

    #[test]
    fn unblockable_against_dodger_is_all_or_nothing() {
        let config = BattleConfig::default();
        let mut rng = SeededRoller::new(9);
        for raw in 1..200 {
            let r = resolve_defense(
                DefensiveStance::Dodging,
                &gear(0.0, true),
                raw,
                true,
                &config,
                &mut rng,
            );
            assert!(r.damage == 0 || r.damage == raw);
            assert_eq!(r.block, None);
        }
    }

    #[test]
    fn unblockable_bypasses_block_without_rolling() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRoller::new([0.0]);
        let r = resolve_defense(
            DefensiveStance::Blocking,
            &gear(0.0, true),
            30,
            true,
            &config,
            &mut rng,
        );
        assert_eq!(r.block, Some(BlockResult::Bypassed));
        assert_eq!(r.damage, 30);
        assert_eq!(rng.remaining(), 1);
    }

    #[test]
    fn shielded_block_is_perfect() {
        let config = BattleConfig::default();
        let mut rng = SeededRoller::new(3);
        for raw in 1..100 {
            let r = resolve_defense(
                DefensiveStance::Blocking,
                &gear(0.0, true),
                raw,
                false,
                &config,
                &mut rng,
            );
            assert_eq!(r.block, Some(BlockResult::Blocked));
            assert_eq!(r.damage, 0);
        }
    }

    #[test]
    fn unshielded_block_leaks_at_least_one() {
        let config = BattleConfig::default();
        for raw in [1, 7, 99, 100, 101, 250] {
            let mut rng = ScriptedRoller::new([0.5]);
            let r = resolve_defense(
                DefensiveStance::Blocking,
                &gear(0.0, false),
                raw,
                false,
                &config,
                &mut rng,
            );
            assert_eq!(r.block, Some(BlockResult::Blocked));
            assert_eq!(r.damage, (raw as f32 * 0.01).ceil() as u32);
            assert!(r.damage >= 1);
        }
    }

    #[test]
    fn failed_block_roll_deals_full_damage() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRoller::new([0.995]);
        let r = resolve_defense(
            DefensiveStance::Blocking,
            &gear(0.0, false),
            30,
            false,
            &config,
            &mut rng,
        );
        assert_eq!(r.block, Some(BlockResult::Failed));
        assert_eq!(r.damage, 30);
    }

    #[test]
    fn no_stance_passes_damage_through() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRoller::new([]);
        let r = resolve_defense(
            DefensiveStance::None,
            &gear(0.0, true),
            12,
            false,
            &config,
            &mut rng,
        );
        assert_eq!(r, DefenseResolution::undefended(12));
    }
}
