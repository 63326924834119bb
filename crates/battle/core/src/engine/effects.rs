//! Shared resolution steps: skills, damage, healing, deaths, strategy hooks
//! and status effects.

use tracing::{debug, info};

use super::BattleEngine;
use crate::ai::{AiEffect, ReactionContext, RedirectView};
use crate::catalog::{ItemDefinition, SkillDefinition};
use crate::combat::{
    BlockResult, item_damage, lifesteal_amount, resolve_defense, roll_critical, skill_damage,
};
use crate::event::BattleEvent;
use crate::state::{SkillTargetType, StatusEffectType, UnitId};

impl BattleEngine {
    // ------------------------------------------------------------------
    // Inbound status changes
    // ------------------------------------------------------------------

    /// Applies a status effect to a living unit, replacing any of the same kind.
    ///
    /// Returns false when nothing was applied (dead unit or `None` kind).
    pub fn apply_status_effect(
        &mut self,
        unit: UnitId,
        kind: StatusEffectType,
        duration: u32,
        value: f32,
    ) -> bool {
        if !self.roster.is_alive(unit) || !self.statuses.apply(unit, kind, duration, value) {
            return false;
        }
        self.emit(BattleEvent::StatusEffectApplied {
            unit,
            effect: kind,
            duration,
        });
        true
    }

    /// Removes every effect of `kind`, emitting one expiry per removal.
    pub fn cure_status_effect(&mut self, unit: UnitId, kind: StatusEffectType) -> usize {
        let removed = self.statuses.cure(unit, kind);
        for _ in 0..removed {
            self.emit(BattleEvent::StatusEffectExpired { unit, effect: kind });
        }
        removed
    }

    /// Turn-end tick over every unit with effects, in first-application order.
    ///
    /// Damage-over-time kills credit the dying unit as its own killer.
    pub fn tick_status_effects(&mut self) {
        for id in self.statuses.units() {
            let Some(unit) = self.roster.get_mut(id) else {
                continue;
            };
            let report = self.statuses.tick_unit(unit);
            for (effect, damage) in report.damage {
                self.emit(BattleEvent::StatusEffectTicked {
                    unit: id,
                    effect,
                    damage,
                });
            }
            if report.died {
                self.notify_death(id, id);
            }
            for effect in report.expired {
                self.emit(BattleEvent::StatusEffectExpired { unit: id, effect });
            }
        }
    }

    // ------------------------------------------------------------------
    // Skills and items
    // ------------------------------------------------------------------

    /// Resolves a skill in order: heal, damage, resource burn, item
    /// destruction, status rider.
    ///
    /// Area skills hit every living opponent of the caster, rolling crit and
    /// defense independently per target. Resource burn and the status rider
    /// still land on the primary target alone.
    pub(super) fn execute_skill(
        &mut self,
        skill: &SkillDefinition,
        caster: UnitId,
        target: Option<UnitId>,
        unblockable: bool,
    ) {
        let Some(caster_side) = self.roster.side_of(caster) else {
            return;
        };
        let target = match skill.target {
            SkillTargetType::SelfTarget => Some(caster),
            _ => target,
        };

        if skill.heal_amount > 0 {
            let recipient = match skill.target {
                SkillTargetType::Enemy => Some(caster),
                _ => target,
            };
            if let Some(recipient) = recipient {
                self.heal_unit(recipient, skill.heal_amount);
            }
        }

        let victims: Vec<UnitId> = if skill.target != SkillTargetType::Enemy {
            Vec::new()
        } else if skill.area {
            self.roster.living_ids(caster_side.opposing())
        } else {
            target
                .filter(|t| self.roster.is_alive(*t))
                .into_iter()
                .collect()
        };

        if skill.is_offensive() {
            for &victim in &victims {
                self.skill_strike(skill, caster, victim, unblockable);
            }
        }

        let primary = target.filter(|t| self.roster.is_alive(*t));

        if skill.resource_burn > 0
            && let Some(victim) = primary
        {
            let burned = self
                .roster
                .get_mut(victim)
                .filter(|u| u.is_alive() && u.max_resource > 0)
                .map_or(0, |u| u.burn_resource(skill.resource_burn));
            if burned > 0 {
                self.emit(BattleEvent::ResourceBurned {
                    unit: victim,
                    amount: burned,
                });
            }
        }

        if skill.destroys_item {
            self.destroy_random_item(caster);
        }

        if let Some(rider) = &skill.status
            && let Some(recipient) = primary
            && self.rng.unit() < rider.chance
        {
            self.apply_status_effect(recipient, rider.kind, rider.duration, rider.value);
        }
    }

    /// One skill hit: damage, crit, defense when the target holds a stance,
    /// lifesteal on damage actually dealt.
    fn skill_strike(
        &mut self,
        skill: &SkillDefinition,
        caster: UnitId,
        target: UnitId,
        unblockable: bool,
    ) {
        let (Some(c), Some(t)) = (self.roster.get(caster), self.roster.get(target)) else {
            return;
        };
        if !t.is_alive() {
            return;
        }
        let raw = skill_damage(
            self.statuses.effective_attack(c),
            self.statuses.effective_defense(t),
            skill.damage_multiplier,
            skill.element,
            t.element,
            &self.config,
        );
        let crit = roll_critical(raw, c.crit_chance, &self.config, &mut *self.rng);
        if crit.critical {
            self.emit(BattleEvent::CriticalHit {
                attacker: caster,
                target,
            });
        }
        self.emit(BattleEvent::AttackExecuted {
            attacker: caster,
            target,
            raw_damage: crit.damage,
        });

        let damage = self.resolve_incoming(target, crit.damage, unblockable);
        let dealt = self.deal_damage(target, caster, damage);
        if skill.lifesteal > 0.0 && dealt > 0 && self.roster.is_alive(caster) {
            self.heal_unit(caster, lifesteal_amount(dealt, skill.lifesteal));
        }
    }

    /// Flat item damage with element and crit. Items ignore defensive stances.
    pub(super) fn item_strike(&mut self, item: &ItemDefinition, user: UnitId, target: UnitId) {
        let (Some(u), Some(t)) = (self.roster.get(user), self.roster.get(target)) else {
            return;
        };
        let raw = item_damage(item.damage, item.damage_element, t.element, &self.config);
        let crit = roll_critical(raw, u.crit_chance, &self.config, &mut *self.rng);
        if crit.critical {
            self.emit(BattleEvent::CriticalHit {
                attacker: user,
                target,
            });
        }
        self.emit(BattleEvent::AttackExecuted {
            attacker: user,
            target,
            raw_damage: crit.damage,
        });
        self.deal_damage(target, user, crit.damage);
    }

    /// Destroys one random stocked item from the party inventory.
    fn destroy_random_item(&mut self, caster: UnitId) {
        let stocked = self.inventory.stocked_slots();
        if stocked.is_empty() {
            return;
        }
        let slot = stocked[self.rng.index(stocked.len())];
        if let Some(item) = self.inventory.take(slot) {
            debug!(target: "battle::engine", %caster, item = %item.name, "Item destroyed");
            self.emit(BattleEvent::ItemDestroyed { item: item.name });
        }
    }

    // ------------------------------------------------------------------
    // Damage, healing and death
    // ------------------------------------------------------------------

    /// Runs `raw` through the target's defensive stance, emitting dodge and
    /// block events. Units without a stance take `raw` unchanged.
    pub(super) fn resolve_incoming(&mut self, target: UnitId, raw: u32, unblockable: bool) -> u32 {
        let Some(unit) = self.roster.get(target) else {
            return raw;
        };
        let stance = self.stances.get(&target).copied().unwrap_or_default();
        let resolution = resolve_defense(
            stance,
            &unit.gear,
            raw,
            unblockable,
            &self.config,
            &mut *self.rng,
        );

        match resolution.dodge {
            Some(true) => self.emit(BattleEvent::DodgeSucceeded { unit: target }),
            Some(false) => self.emit(BattleEvent::DodgeFailed { unit: target }),
            None => {}
        }
        match resolution.block {
            Some(BlockResult::Blocked) => self.emit(BattleEvent::BlockSucceeded {
                unit: target,
                damage: resolution.damage,
            }),
            Some(BlockResult::Bypassed) => self.emit(BattleEvent::BlockBypassed { unit: target }),
            Some(BlockResult::Failed) | None => {}
        }
        resolution.damage
    }

    /// Applies damage and handles a resulting death. Returns HP actually lost.
    pub(super) fn deal_damage(&mut self, target: UnitId, source: UnitId, amount: u32) -> u32 {
        if amount == 0 {
            return 0;
        }
        let Some(unit) = self.roster.get_mut(target).filter(|u| u.is_alive()) else {
            return 0;
        };
        let before = unit.hp;
        let killed = unit.take_damage(amount);
        let dealt = before - unit.hp;

        self.emit(BattleEvent::DamageTaken {
            unit: target,
            source,
            amount: dealt,
        });
        if killed {
            self.notify_death(target, source);
        }
        dealt
    }

    /// Heals a living unit. Returns HP actually restored.
    pub(super) fn heal_unit(&mut self, unit: UnitId, amount: u32) -> u32 {
        let healed = self.roster.get_mut(unit).map_or(0, |u| u.heal(amount));
        if healed > 0 {
            self.emit(BattleEvent::HealApplied {
                unit,
                amount: healed,
            });
        }
        healed
    }

    /// Announces a death and lets every strategy react, in roster order.
    ///
    /// Dead strategies are notified too, so on-death abilities of the dying
    /// unit itself fire here.
    fn notify_death(&mut self, dead: UnitId, killer: UnitId) {
        info!(target: "battle::engine", unit = %dead, %killer, "Unit died");
        self.emit(BattleEvent::UnitDied { unit: dead, killer });

        for index in 0..self.ais.len() {
            let Some(me) = self.roster.enemies().get(index) else {
                break;
            };
            let mut ctx = ReactionContext::new(me, &self.roster, &self.statuses);
            self.ais[index].on_unit_died(&mut ctx, dead, killer);
            let effects = ctx.into_effects();
            self.apply_ai_effects(effects);
        }
    }

    /// Runs every strategy's battle-start hook, in roster order.
    pub(super) fn run_battle_start_hooks(&mut self) {
        for index in 0..self.ais.len() {
            let Some(me) = self.roster.enemies().get(index) else {
                break;
            };
            let mut ctx = ReactionContext::new(me, &self.roster, &self.statuses);
            self.ais[index].on_battle_start(&mut ctx);
            let effects = ctx.into_effects();
            self.apply_ai_effects(effects);
        }
    }

    /// Offers an attack on `target` to every living enemy strategy, returning
    /// the unit that takes the hit.
    pub(super) fn redirect_target(&mut self, attacker: UnitId, target: UnitId) -> UnitId {
        let redirected = self
            .ais
            .iter()
            .zip(self.roster.enemies())
            .filter(|(_, me)| me.is_alive())
            .find_map(|(ai, me)| {
                let view = RedirectView {
                    me,
                    roster: &self.roster,
                };
                ai.redirect_attack(&view, attacker, target)
                    .filter(|r| *r != target && self.roster.is_alive(*r))
            });

        match redirected {
            Some(to) => {
                self.emit(BattleEvent::AttackRedirected {
                    original: target,
                    redirected_to: to,
                });
                to
            }
            None => target,
        }
    }

    /// Applies the effects a strategy queued during a decision or hook.
    pub(super) fn apply_ai_effects(&mut self, effects: Vec<AiEffect>) {
        for effect in effects {
            match effect {
                AiEffect::ApplyStatus {
                    unit,
                    kind,
                    duration,
                    value,
                } => {
                    self.apply_status_effect(unit, kind, duration, value);
                }
                AiEffect::CureStatus { unit, kind } => {
                    self.cure_status_effect(unit, kind);
                }
                AiEffect::Heal { unit, amount } => {
                    self.heal_unit(unit, amount);
                }
                AiEffect::RaiseAttack { unit, amount } => {
                    if let Some(u) = self.roster.get_mut(unit) {
                        u.attack += amount;
                        debug!(target: "battle::ai", %unit, attack = u.attack, "Attack raised");
                    }
                }
                AiEffect::SetElement { unit, element } => {
                    if let Some(u) = self.roster.get_mut(unit) {
                        u.element = element;
                        debug!(target: "battle::ai", %unit, %element, "Element changed");
                    }
                }
                AiEffect::Flee { unit } => {
                    if let Some(u) = self.roster.get_mut(unit).filter(|u| u.is_alive()) {
                        u.mark_fled();
                        info!(target: "battle::engine", %unit, "Unit fled");
                        self.emit(BattleEvent::UnitFled { unit });
                    }
                }
            }
        }
    }
}
