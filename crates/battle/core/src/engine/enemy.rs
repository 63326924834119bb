//! Enemy intent declaration and execution.

use tracing::warn;

use super::BattleEngine;
use crate::ai::{AiContext, DeclaredIntent};
use crate::combat::{raw_damage, roll_critical};
use crate::event::BattleEvent;
use crate::state::{Side, SkillTargetType, UnitId};

/// Result of preparing the next declared intent for execution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyStep {
    /// The declaring enemy is no longer alive. Nothing was emitted.
    Skipped,
    /// The enemy is stunned and loses its action.
    Stunned(UnitId),
    /// A heal or buff lost its target and is dropped.
    TargetLost(UnitId),
    /// The intent is pending; call [`BattleEngine::execute_enemy_action`].
    Ready { enemy: UnitId, target: UnitId },
    /// No party member is left to retarget to.
    Halted,
    /// Every declared intent has been processed.
    Done,
}

impl BattleEngine {
    /// Asks every living enemy for its intent, in roster order.
    ///
    /// Strategy effects are applied right after each decision, so later
    /// enemies see them. Targets that are dead or unknown are replaced by the
    /// first living party member.
    pub(super) fn declare_intents(&mut self) {
        for index in 0..self.ais.len() {
            let Some(enemy) = self.roster.enemies().get(index) else {
                break;
            };
            if !enemy.is_alive() {
                continue;
            }
            let enemy_id = enemy.id;

            let Some(mut ctx) = AiContext::new(
                enemy,
                &self.roster,
                &self.statuses,
                &self.memory,
                &mut *self.rng,
            ) else {
                break;
            };
            let intent = self.ais[index].decide_action(&mut ctx);
            let effects = ctx.into_effects();
            self.apply_ai_effects(effects);

            // fled or otherwise removed by its own effects
            if !self.roster.is_alive(enemy_id) {
                continue;
            }

            let intent = if self.roster.is_alive(intent.target) {
                intent
            } else {
                let Some(fallback) = self.roster.first_living(Side::Party).map(|u| u.id) else {
                    break;
                };
                warn!(
                    target: "battle::ai",
                    enemy = %enemy_id,
                    pattern = %self.ais[index].pattern(),
                    requested = %intent.target,
                    fallback = %fallback,
                    "Intent aimed at a dead or unknown unit; retargeting"
                );
                intent.retargeted(fallback)
            };

            self.emit(BattleEvent::EnemyIntentDeclared {
                enemy: enemy_id,
                target: intent.target,
                unblockable: intent.unblockable,
                estimated_damage: intent.estimated_damage,
                skill: intent.skill_name().map(str::to_owned),
            });
            self.intents.push(DeclaredIntent {
                enemy: enemy_id,
                intent,
            });
        }
    }

    /// Prepares the next declared intent, in declaration order.
    ///
    /// Dead attackers are skipped silently. Offensive intents whose target
    /// died are retargeted to the first living party member; heals and buffs
    /// whose target died are dropped.
    pub fn next_enemy_action(&mut self) -> EnemyStep {
        let Some(declared) = self.intents.get(self.next_intent).cloned() else {
            return EnemyStep::Done;
        };
        self.next_intent += 1;

        let DeclaredIntent { enemy, intent } = declared;
        if !self.roster.is_alive(enemy) {
            return EnemyStep::Skipped;
        }
        if self.statuses.is_stunned(enemy) {
            self.emit(BattleEvent::StunSkipped { unit: enemy });
            return EnemyStep::Stunned(enemy);
        }

        let intent = if self.roster.is_alive(intent.target) {
            intent
        } else {
            let supportive = intent
                .skill
                .as_ref()
                .is_some_and(|s| s.target != SkillTargetType::Enemy);
            if supportive {
                return EnemyStep::TargetLost(enemy);
            }
            match self.roster.first_living(Side::Party) {
                Some(unit) => intent.retargeted(unit.id),
                None => {
                    self.next_intent = self.intents.len();
                    return EnemyStep::Halted;
                }
            }
        };

        let target = intent.target;
        self.emit(BattleEvent::EnemyActionStarted { enemy, target });
        self.pending_enemy = Some(DeclaredIntent { enemy, intent });
        EnemyStep::Ready { enemy, target }
    }

    /// Executes the intent prepared by [`next_enemy_action`](Self::next_enemy_action).
    pub fn execute_enemy_action(&mut self) {
        let Some(DeclaredIntent { enemy, intent }) = self.pending_enemy.take() else {
            return;
        };
        if !self.roster.is_alive(enemy) {
            return;
        }
        match intent.skill {
            Some(skill) => self.execute_skill(&skill, enemy, Some(intent.target), intent.unblockable),
            None => self.enemy_attack(enemy, intent.target, intent.unblockable),
        }
    }

    /// Basic attack: raw damage, crit, then the target's defensive stance.
    fn enemy_attack(&mut self, attacker: UnitId, target: UnitId, unblockable: bool) {
        let (Some(a), Some(t)) = (self.roster.get(attacker), self.roster.get(target)) else {
            return;
        };
        if !t.is_alive() {
            return;
        }
        let raw = raw_damage(
            self.statuses.effective_attack(a),
            self.statuses.effective_defense(t),
            a.element,
            t.element,
            &self.config,
        );
        let crit = roll_critical(raw, a.crit_chance, &self.config, &mut *self.rng);
        if crit.critical {
            self.emit(BattleEvent::CriticalHit { attacker, target });
        }
        self.emit(BattleEvent::AttackExecuted {
            attacker,
            target,
            raw_damage: crit.damage,
        });
        let damage = self.resolve_incoming(target, crit.damage, unblockable);
        self.deal_damage(target, attacker, damage);
    }
}
