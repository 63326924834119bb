//! Status effect store.
//!
//! Every unit owns at most one effect of each [`StatusEffectType`]; applying a
//! type that is already present replaces it (refreshing duration and value)
//! instead of stacking.
//!
//! # Turn-based Duration
//!
//! Effects count down in whole turns. [`StatusBook::tick_unit`] first applies
//! all damage-over-time effects of a unit, then decrements every counter and
//! removes what reached zero, so an effect on its last turn still deals its
//! final tick.

use arrayvec::ArrayVec;

use super::types::{StatusEffectType, UnitId};
use super::unit::BattleUnit;

/// A single active effect.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectType,
    pub remaining_turns: u32,
    /// Damage per tick for DoTs, stat multiplier for buffs and debuffs.
    pub value: f32,
}

impl StatusEffect {
    pub const fn new(kind: StatusEffectType, remaining_turns: u32, value: f32) -> Self {
        Self {
            kind,
            remaining_turns,
            value,
        }
    }

    /// Damage dealt by one tick of this effect, never below 1.
    pub fn tick_damage(&self) -> u32 {
        (self.value.round() as i64).max(1) as u32
    }
}

/// Active effects of one unit, in application order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { StatusEffectType::COUNT }>,
}

impl StatusEffects {
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Replaces any effect of the same kind and appends the new one.
    ///
    /// Returns false for [`StatusEffectType::None`], which is never stored.
    pub fn apply(&mut self, effect: StatusEffect) -> bool {
        if effect.kind == StatusEffectType::None {
            return false;
        }
        self.effects.retain(|e| e.kind != effect.kind);
        // One slot per kind, so after the retain there is always room.
        self.effects.push(effect);
        true
    }

    /// Removes every effect of `kind`, returning how many were removed.
    pub fn remove(&mut self, kind: StatusEffectType) -> usize {
        let before = self.effects.len();
        self.effects.retain(|e| e.kind != kind);
        before - self.effects.len()
    }

    pub fn get(&self, kind: StatusEffectType) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.kind == kind)
    }

    pub fn has(&self, kind: StatusEffectType) -> bool {
        self.get(kind).is_some()
    }

    pub fn is_stunned(&self) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind == StatusEffectType::Stun && e.remaining_turns > 0)
    }

    /// Product of all active attack modifiers.
    pub fn attack_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.kind.modifies_attack())
            .map(|e| e.value)
            .product()
    }

    /// Product of all active defense modifiers.
    pub fn defense_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .filter(|e| e.kind.modifies_defense())
            .map(|e| e.value)
            .product()
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn clear(&mut self) {
        self.effects.clear();
    }
}

/// What happened to one unit during a status tick, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TickReport {
    pub damage: Vec<(StatusEffectType, u32)>,
    /// The unit died from damage over time. Its effects were cleared.
    pub died: bool,
    pub expired: Vec<StatusEffectType>,
}

/// Per-unit effect lists for a whole battle.
///
/// Units are kept in the order in which they first received an effect; ticks
/// walk that order.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusBook {
    entries: Vec<(UnitId, StatusEffects)>,
}

impl StatusBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an effect with replace-on-reapply semantics.
    ///
    /// Returns false (and changes nothing) for [`StatusEffectType::None`].
    pub fn apply(
        &mut self,
        unit: UnitId,
        kind: StatusEffectType,
        duration: u32,
        value: f32,
    ) -> bool {
        if kind == StatusEffectType::None {
            return false;
        }
        self.entry_mut(unit)
            .apply(StatusEffect::new(kind, duration, value))
    }

    /// Removes all effects of `kind` from `unit`, returning the count removed.
    pub fn cure(&mut self, unit: UnitId, kind: StatusEffectType) -> usize {
        self.entries
            .iter_mut()
            .find(|(id, _)| *id == unit)
            .map_or(0, |(_, effects)| effects.remove(kind))
    }

    pub fn effects(&self, unit: UnitId) -> Option<&StatusEffects> {
        self.entries
            .iter()
            .find(|(id, _)| *id == unit)
            .map(|(_, effects)| effects)
    }

    pub fn has(&self, unit: UnitId, kind: StatusEffectType) -> bool {
        self.effects(unit).is_some_and(|e| e.has(kind))
    }

    pub fn is_stunned(&self, unit: UnitId) -> bool {
        self.effects(unit).is_some_and(StatusEffects::is_stunned)
    }

    /// Base attack scaled by every active attack modifier.
    pub fn effective_attack(&self, unit: &BattleUnit) -> f32 {
        let mult = self
            .effects(unit.id)
            .map_or(1.0, StatusEffects::attack_multiplier);
        unit.attack as f32 * mult
    }

    /// Base defense scaled by every active defense modifier.
    pub fn effective_defense(&self, unit: &BattleUnit) -> f32 {
        let mult = self
            .effects(unit.id)
            .map_or(1.0, StatusEffects::defense_multiplier);
        unit.defense as f32 * mult
    }

    /// Units with an effect list, in first-application order.
    pub fn units(&self) -> Vec<UnitId> {
        self.entries.iter().map(|(id, _)| *id).collect()
    }

    /// Runs one turn-end tick for `unit`.
    ///
    /// Dead units are left untouched. A damage-over-time kill clears the
    /// unit's list and skips expiry processing.
    pub fn tick_unit(&mut self, unit: &mut BattleUnit) -> TickReport {
        let mut report = TickReport::default();
        if !unit.is_alive() {
            return report;
        }
        let Some((_, effects)) = self.entries.iter_mut().find(|(id, _)| *id == unit.id) else {
            return report;
        };

        for effect in effects.effects.iter().filter(|e| e.kind.is_damage_over_time()) {
            let amount = effect.tick_damage();
            report.damage.push((effect.kind, amount));
            if unit.take_damage(amount) {
                report.died = true;
                break;
            }
        }
        if report.died {
            effects.clear();
            return report;
        }

        for effect in effects.effects.iter_mut() {
            effect.remaining_turns = effect.remaining_turns.saturating_sub(1);
            if effect.remaining_turns == 0 {
                report.expired.push(effect.kind);
            }
        }
        effects.effects.retain(|e| e.remaining_turns > 0);
        report
    }

    /// Drops every effect of every unit.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn entry_mut(&mut self, unit: UnitId) -> &mut StatusEffects {
        let index = match self.entries.iter().position(|(id, _)| *id == unit) {
            Some(index) => index,
            None => {
                self.entries.push((unit, StatusEffects::empty()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[index].1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{UnitStats, UnitType};

    fn unit(id: u16, hp: u32) -> BattleUnit {
        let mut u = BattleUnit::new("u", UnitType::Knight, UnitStats::new(hp, 20, 10));
        u.id = UnitId(id);
        u
    }

    #[test]
    fn reapplying_replaces_instead_of_stacking() {
        let mut book = StatusBook::new();
        book.apply(UnitId(0), StatusEffectType::Poison, 3, 4.0);
        book.apply(UnitId(0), StatusEffectType::Poison, 5, 7.0);

        let effects = book.effects(UnitId(0)).unwrap();
        assert_eq!(effects.len(), 1);
        let poison = effects.get(StatusEffectType::Poison).unwrap();
        assert_eq!(poison.remaining_turns, 5);
        assert_eq!(poison.value, 7.0);
    }

    #[test]
    fn none_type_is_ignored() {
        let mut book = StatusBook::new();
        assert!(!book.apply(UnitId(0), StatusEffectType::None, 3, 1.0));
        assert!(book.effects(UnitId(0)).is_none());
    }

    #[test]
    fn modifiers_multiply() {
        let mut book = StatusBook::new();
        let u = unit(0, 100);
        book.apply(u.id, StatusEffectType::AtkUp, 2, 1.5);
        book.apply(u.id, StatusEffectType::AtkDown, 2, 0.5);
        book.apply(u.id, StatusEffectType::DefUp, 2, 2.0);
        assert!((book.effective_attack(&u) - 15.0).abs() < f32::EPSILON);
        assert!((book.effective_defense(&u) - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn stun_requires_remaining_turns() {
        let mut book = StatusBook::new();
        book.apply(UnitId(0), StatusEffectType::Stun, 0, 0.0);
        assert!(!book.is_stunned(UnitId(0)));
        book.apply(UnitId(0), StatusEffectType::Stun, 1, 0.0);
        assert!(book.is_stunned(UnitId(0)));
    }

    #[test]
    fn last_turn_still_deals_damage_before_expiring() {
        let mut book = StatusBook::new();
        let mut u = unit(0, 50);
        book.apply(u.id, StatusEffectType::Burn, 1, 5.0);

        let report = book.tick_unit(&mut u);
        assert_eq!(report.damage, vec![(StatusEffectType::Burn, 5)]);
        assert_eq!(report.expired, vec![StatusEffectType::Burn]);
        assert_eq!(u.hp, 45);
        assert!(book.effects(u.id).unwrap().is_empty());
    }

    #[test]
    fn tick_damage_is_at_least_one() {
        let mut book = StatusBook::new();
        let mut u = unit(0, 50);
        book.apply(u.id, StatusEffectType::Poison, 3, 0.2);
        let report = book.tick_unit(&mut u);
        assert_eq!(report.damage, vec![(StatusEffectType::Poison, 1)]);
        assert!(report.expired.is_empty());
    }

    #[test]
    fn lethal_tick_clears_effects() {
        let mut book = StatusBook::new();
        let mut u = unit(0, 3);
        book.apply(u.id, StatusEffectType::Poison, 3, 4.0);
        book.apply(u.id, StatusEffectType::AtkUp, 1, 1.5);

        let report = book.tick_unit(&mut u);
        assert!(report.died);
        assert!(report.expired.is_empty());
        assert!(!u.is_alive());
        assert!(book.effects(u.id).unwrap().is_empty());
    }

    #[test]
    fn dead_units_are_not_ticked() {
        let mut book = StatusBook::new();
        let mut u = unit(0, 10);
        book.apply(u.id, StatusEffectType::Burn, 2, 5.0);
        u.take_damage(10);
        let report = book.tick_unit(&mut u);
        assert_eq!(report, TickReport::default());
        assert_eq!(book.effects(u.id).unwrap().len(), 1);
    }

    #[test]
    fn units_keep_first_application_order() {
        let mut book = StatusBook::new();
        book.apply(UnitId(3), StatusEffectType::Burn, 2, 1.0);
        book.apply(UnitId(1), StatusEffectType::Burn, 2, 1.0);
        book.apply(UnitId(3), StatusEffectType::Stun, 1, 0.0);
        assert_eq!(book.units(), vec![UnitId(3), UnitId(1)]);
    }

    #[test]
    fn cure_reports_removed_count() {
        let mut book = StatusBook::new();
        book.apply(UnitId(0), StatusEffectType::Poison, 3, 4.0);
        assert_eq!(book.cure(UnitId(0), StatusEffectType::Poison), 1);
        assert_eq!(book.cure(UnitId(0), StatusEffectType::Poison), 0);
        assert_eq!(book.cure(UnitId(9), StatusEffectType::Poison), 0);
    }
}
