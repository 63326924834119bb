//! Damage formulas.
//!
//! Rounding is half away from zero throughout (`22.5 → 23`), and every
//! formula that produces a hit clamps to at least 1 before critical hits.

use super::element::element_multiplier;
use super::rng::Roller;
use crate::config::BattleConfig;
use crate::state::ElementType;

#[inline]
fn round(value: f32) -> i64 {
    value.round() as i64
}

#[inline]
fn at_least_one(value: i64) -> u32 {
    value.clamp(1, u32::MAX as i64) as u32
}

/// Basic attack damage before defense resolution and critical hits.
///
/// Formula: `max(1, round((round(atk) - round(def)) × element))`
pub fn raw_damage(
    effective_attack: f32,
    effective_defense: f32,
    attacker_element: ElementType,
    defender_element: ElementType,
    config: &BattleConfig,
) -> u32 {
    let base = round(effective_attack) - round(effective_defense);
    let mult = element_multiplier(attacker_element, defender_element, config);
    at_least_one(round(base as f32 * mult))
}

/// Skill damage before defense resolution and critical hits.
///
/// The skill's element replaces the caster's element for the matchup.
///
/// Formula:
/// - `base = max(0, round(atk) - round(def))`
/// - `scaled = max(1, round(base × skill_multiplier))`
/// - `max(1, round(scaled × element))`
pub fn skill_damage(
    effective_attack: f32,
    effective_defense: f32,
    damage_multiplier: f32,
    skill_element: ElementType,
    defender_element: ElementType,
    config: &BattleConfig,
) -> u32 {
    let base = (round(effective_attack) - round(effective_defense)).max(0);
    let scaled = at_least_one(round(base as f32 * damage_multiplier));
    let mult = element_multiplier(skill_element, defender_element, config);
    at_least_one(round(scaled as f32 * mult))
}

/// Flat item damage adjusted for element: `max(1, round(damage × element))`.
pub fn item_damage(
    damage: u32,
    item_element: ElementType,
    defender_element: ElementType,
    config: &BattleConfig,
) -> u32 {
    let mult = element_multiplier(item_element, defender_element, config);
    at_least_one(round(damage as f32 * mult))
}

/// Outcome of a critical hit roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CriticalRoll {
    pub damage: u32,
    pub critical: bool,
}

/// Rolls for a critical hit; on success damage is scaled by the crit multiplier.
pub fn roll_critical(
    damage: u32,
    crit_chance: f32,
    config: &BattleConfig,
    rng: &mut dyn Roller,
) -> CriticalRoll {
    if rng.unit() < crit_chance {
        CriticalRoll {
            damage: round(damage as f32 * config.critical_multiplier).max(0) as u32,
            critical: true,
        }
    } else {
        CriticalRoll {
            damage,
            critical: false,
        }
    }
}

/// HP returned to a lifestealing caster: `max(1, round(dealt × ratio))`.
pub fn lifesteal_amount(dealt: u32, ratio: f32) -> u32 {
    at_least_one(round(dealt as f32 * ratio))
}

/// Intent preview for a basic attack: `max(1, atk - def)` on base stats.
pub fn estimate_basic(attack: i32, defense: i32) -> u32 {
    at_least_one(i64::from(attack) - i64::from(defense))
}

/// Intent preview for a skill: `max(1, round((atk - def) × multiplier))`.
pub fn estimate_skill(attack: i32, defense: i32, damage_multiplier: f32) -> u32 {
    let base = (attack - defense) as f32;
    at_least_one(round(base * damage_multiplier))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::rng::ScriptedRoller;

    #[test]
    fn neutral_basic_attack() {
        let config = BattleConfig::default();
        let dmg = raw_damage(20.0, 5.0, ElementType::None, ElementType::None, &config);
        assert_eq!(dmg, 15);
    }

    #[test]
    fn strong_element_rounds_half_up() {
        let config = BattleConfig::default();
        let dmg = raw_damage(20.0, 5.0, ElementType::Ignis, ElementType::Ventus, &config);
        assert_eq!(dmg, 23);
    }

    #[test]
    fn never_below_one() {
        let config = BattleConfig::default();
        for (atk, def) in [(0.0, 0.0), (1.0, 50.0), (5.0, 5.0), (-3.0, 10.0)] {
            for (a, d) in [
                (ElementType::None, ElementType::None),
                (ElementType::Ventus, ElementType::Ignis),
            ] {
                assert!(raw_damage(atk, def, a, d, &config) >= 1);
                assert!(skill_damage(atk, def, 0.5, a, d, &config) >= 1);
            }
        }
    }

    #[test]
    fn skill_uses_skill_element_and_two_roundings() {
        let config = BattleConfig::default();
        // base 15, × 1.5 = 22.5 → 23, Umbra vs Lux × 1.5 = 34.5 → 35
        let dmg = skill_damage(20.0, 5.0, 1.5, ElementType::Umbra, ElementType::Lux, &config);
        assert_eq!(dmg, 35);
    }

    #[test]
    fn critical_applies_after_element() {
        let config = BattleConfig::default();
        let mut hit = ScriptedRoller::new([0.05]);
        let roll = roll_critical(23, 0.1, &config, &mut hit);
        assert!(roll.critical);
        assert_eq!(roll.damage, 35);

        let mut miss = ScriptedRoller::new([0.5]);
        let roll = roll_critical(23, 0.1, &config, &mut miss);
        assert!(!roll.critical);
        assert_eq!(roll.damage, 23);
    }

    #[test]
    fn item_damage_scales_by_element() {
        let config = BattleConfig::default();
        assert_eq!(item_damage(25, ElementType::Ignis, ElementType::Ventus, &config), 38);
        assert_eq!(item_damage(25, ElementType::Ignis, ElementType::Aqua, &config), 13);
    }

    #[test]
    fn estimates_clamp_to_one() {
        assert_eq!(estimate_basic(5, 20), 1);
        assert_eq!(estimate_basic(20, 5), 15);
        assert_eq!(estimate_skill(20, 5, 2.5), 38);
        assert_eq!(lifesteal_amount(1, 0.5), 1);
        assert_eq!(lifesteal_amount(30, 0.75), 23);
    }
}
