//! Target selection and intent helpers shared by all strategies.
//!
//! Every finder skips dead units and breaks ties in favour of the earliest
//! unit in the slice.

use super::intent::Intent;
use crate::catalog::SkillDefinition;
use crate::combat::{Roller, estimate_basic, estimate_skill, is_strong_against};
use crate::state::{BattleUnit, ElementType, StatusEffectType};

/// Base weight every living target starts with.
pub const BASE_WEIGHT: f32 = 10.0;
/// Weight added at 0% HP, scaled linearly by missing HP fraction.
pub const MISSING_HP_WEIGHT: f32 = 50.0;
/// Bonus for targets weak to the attack element.
pub const WEAKNESS_WEIGHT: f32 = 30.0;
/// Upper bound (exclusive) of the uniform jitter added to every weight.
pub const JITTER_WEIGHT: f32 = 20.0;

/// Basic attack intent. Rolls the attacker's unblockable chance.
pub fn basic_attack(me: &BattleUnit, target: &BattleUnit, rng: &mut dyn Roller) -> Intent {
    let unblockable = rng.unit() < me.unblockable_chance;
    Intent::basic(
        target.id,
        unblockable,
        estimate_basic(me.attack, target.defense),
    )
}

/// Skill intent. The preview is damage for offensive skills, otherwise the
/// heal amount. Skill intents are never unblockable.
pub fn skill_attack(me: &BattleUnit, target: &BattleUnit, skill: SkillDefinition) -> Intent {
    let estimate = if skill.is_offensive() {
        estimate_skill(me.attack, target.defense, skill.damage_multiplier)
    } else {
        skill.heal_amount
    };
    Intent::with_skill(target.id, estimate, skill)
}

/// Aggro roulette over living targets.
///
/// Weight per target: `10 + (1 - hp%) × 50 + 30 if weak to element + U[0, 20)`.
/// The roll lands in `[0, total)` and picks the first target whose cumulative
/// weight reaches it, falling back to the last target.
pub fn pick_weighted_target<'a>(
    targets: &[&'a BattleUnit],
    element: ElementType,
    rng: &mut dyn Roller,
) -> Option<&'a BattleUnit> {
    let mut weights = Vec::with_capacity(targets.len());
    let mut total = 0.0_f32;
    for target in targets {
        let weight = if target.is_alive() {
            let mut w = BASE_WEIGHT + (1.0 - target.hp_fraction()) * MISSING_HP_WEIGHT;
            if is_strong_against(element, target.element) {
                w += WEAKNESS_WEIGHT;
            }
            w + rng.range(0.0, JITTER_WEIGHT)
        } else {
            0.0
        };
        weights.push(weight);
        total += weight;
    }

    if total <= 0.0 {
        return targets.first().copied();
    }

    let roll = rng.range(0.0, total);
    let mut cumulative = 0.0_f32;
    for (target, weight) in targets.iter().zip(&weights) {
        cumulative += weight;
        if roll <= cumulative {
            return Some(*target);
        }
    }
    targets.last().copied()
}

fn living<'a, 'b>(units: &'b [&'a BattleUnit]) -> impl Iterator<Item = &'a BattleUnit> + 'b {
    units.iter().copied().filter(|u| u.is_alive())
}

/// First living unit whose key is strictly better than all before it.
fn extremal_by<'a, K: PartialOrd>(
    units: &[&'a BattleUnit],
    key: impl Fn(&BattleUnit) -> K,
    better: impl Fn(&K, &K) -> bool,
) -> Option<&'a BattleUnit> {
    let mut best: Option<(&'a BattleUnit, K)> = None;
    for unit in living(units) {
        let k = key(unit);
        let replace = match &best {
            Some((_, best_key)) => better(&k, best_key),
            None => true,
        };
        if replace {
            best = Some((unit, k));
        }
    }
    best.map(|(unit, _)| unit)
}

pub fn lowest_defense<'a>(units: &[&'a BattleUnit]) -> Option<&'a BattleUnit> {
    extremal_by(units, |u| u.defense, |a, b| a < b)
}

pub fn highest_defense<'a>(units: &[&'a BattleUnit]) -> Option<&'a BattleUnit> {
    extremal_by(units, |u| u.defense, |a, b| a > b)
}

pub fn highest_hp<'a>(units: &[&'a BattleUnit]) -> Option<&'a BattleUnit> {
    extremal_by(units, |u| u.hp, |a, b| a > b)
}

pub fn highest_attack<'a>(units: &[&'a BattleUnit]) -> Option<&'a BattleUnit> {
    extremal_by(units, |u| u.attack, |a, b| a > b)
}

pub fn highest_resource<'a>(units: &[&'a BattleUnit]) -> Option<&'a BattleUnit> {
    extremal_by(units, |u| u.resource, |a, b| a > b)
}

pub fn lowest_hp_fraction<'a>(units: &[&'a BattleUnit]) -> Option<&'a BattleUnit> {
    extremal_by(units, BattleUnit::hp_fraction, |a, b| a < b)
}

/// First living unit weak to `element`.
pub fn weakness_target<'a>(units: &[&'a BattleUnit], element: ElementType) -> Option<&'a BattleUnit> {
    living(units).find(|u| is_strong_against(element, u.element))
}

/// Most wounded living unit strictly below `threshold` HP fraction.
pub fn wounded_ally<'a>(units: &[&'a BattleUnit], threshold: f32) -> Option<&'a BattleUnit> {
    living(units)
        .filter(|u| u.hp_fraction() < threshold)
        .fold(None, |best: Option<&'a BattleUnit>, u| match best {
            Some(b) if b.hp_fraction() <= u.hp_fraction() => Some(b),
            _ => Some(u),
        })
}

pub fn random_living<'a>(units: &[&'a BattleUnit], rng: &mut dyn Roller) -> Option<&'a BattleUnit> {
    let alive: Vec<&'a BattleUnit> = living(units).collect();
    if alive.is_empty() {
        return None;
    }
    Some(alive[rng.index(alive.len())])
}

pub fn count_living(units: &[&BattleUnit]) -> usize {
    units.iter().filter(|u| u.is_alive()).count()
}

/// True when the status store shows an attack or defense debuff.
pub fn is_debuffed(effects: Option<&crate::state::StatusEffects>) -> bool {
    effects.is_some_and(|e| e.has(StatusEffectType::AtkDown) || e.has(StatusEffectType::DefDown))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ScriptedRoller;
    use crate::state::{UnitId, UnitStats, UnitType};

    fn unit(id: u16, hp: u32, attack: i32, defense: i32) -> BattleUnit {
        let mut u = BattleUnit::new(
            format!("u{id}"),
            UnitType::Knight,
            UnitStats::new(100, attack, defense),
        );
        u.id = UnitId(id);
        u.take_damage(100 - hp);
        u
    }

    #[test]
    fn basic_attack_estimate_and_unblockable_roll() {
        let me = unit(0, 100, 20, 5);
        let target = unit(1, 100, 10, 8);
        let mut rng = ScriptedRoller::new([0.1, 0.3]);
        let intent = basic_attack(&me, &target, &mut rng);
        assert!(intent.unblockable);
        assert_eq!(intent.estimated_damage, 12);
        assert!(!basic_attack(&me, &target, &mut rng).unblockable);
    }

    #[test]
    fn skill_preview_uses_heal_for_support() {
        let me = unit(0, 100, 20, 5);
        let target = unit(1, 100, 10, 8);
        let heal = SkillDefinition::heal("Benediction", 40, crate::state::SkillTargetType::Ally);
        assert_eq!(skill_attack(&me, &target, heal).estimated_damage, 40);
        let strike = SkillDefinition::strike("Shot", ElementType::Ventus, 2.5);
        let intent = skill_attack(&me, &target, strike);
        assert_eq!(intent.estimated_damage, 30);
        assert!(!intent.unblockable);
    }

    #[test]
    fn weighted_roll_walks_cumulative_weights() {
        let a = unit(0, 100, 20, 5);
        let b = unit(1, 50, 20, 5);
        let targets = [&a, &b];
        // jitter 0 for both: weights 10 and 35, total 45
        let mut rng = ScriptedRoller::new([0.0, 0.0, 0.2]);
        assert_eq!(
            pick_weighted_target(&targets, ElementType::None, &mut rng).unwrap().id,
            UnitId(0)
        );
        let mut rng = ScriptedRoller::new([0.0, 0.0, 0.5]);
        assert_eq!(
            pick_weighted_target(&targets, ElementType::None, &mut rng).unwrap().id,
            UnitId(1)
        );
    }

    #[test]
    fn weakness_adds_weight() {
        let a = unit(0, 100, 20, 5);
        let b = unit(1, 100, 20, 5).with_element(ElementType::Ventus);
        let targets = [&a, &b];
        // weights 10 and 40, total 50; roll 0.3 × 50 = 15 lands on b
        let mut rng = ScriptedRoller::new([0.0, 0.0, 0.3]);
        let picked = pick_weighted_target(&targets, ElementType::Ignis, &mut rng).unwrap();
        assert_eq!(picked.id, UnitId(1));
    }

    #[test]
    fn finders_skip_dead_and_prefer_first_on_ties() {
        let dead = unit(0, 0, 99, 0);
        let a = unit(1, 60, 30, 4);
        let b = unit(2, 60, 30, 4);
        let units = [&dead, &a, &b];
        assert_eq!(highest_attack(&units).unwrap().id, UnitId(1));
        assert_eq!(lowest_defense(&units).unwrap().id, UnitId(1));
        assert_eq!(highest_hp(&units).unwrap().id, UnitId(1));
        assert_eq!(lowest_hp_fraction(&units).unwrap().id, UnitId(1));
    }

    #[test]
    fn wounded_ally_threshold_is_strict() {
        let half = unit(0, 50, 20, 5);
        let low = unit(1, 30, 20, 5);
        let units = [&half, &low];
        assert_eq!(wounded_ally(&units, 0.5).unwrap().id, UnitId(1));
        assert!(wounded_ally(&units, 0.3).is_none());
        assert_eq!(wounded_ally(&units, 1.0).unwrap().id, UnitId(1));
    }

    #[test]
    fn weakness_target_matches_element_cycle() {
        let a = unit(0, 100, 20, 5).with_element(ElementType::Aqua);
        let b = unit(1, 100, 20, 5).with_element(ElementType::Ignis);
        let units = [&a, &b];
        assert_eq!(
            weakness_target(&units, ElementType::Aqua).unwrap().id,
            UnitId(1)
        );
        assert!(weakness_target(&units, ElementType::Lux).is_none());
    }
}
