use crate::ai::targeting::{basic_attack, skill_attack, wounded_ally};
use crate::ai::{AiContext, AiEffect, AiPattern, EnemyAi, Intent, ReactionContext};
use crate::catalog::SkillDefinition;
use crate::state::{SkillTargetType, StatusEffectType, UnitId};

const MEND_THRESHOLD: f32 = 0.5;
const DEATH_HEAL_FRACTION: f32 = 0.3;
const DEATH_ATTACK_MULTIPLIER: f32 = 1.3;
const DEATH_BUFF_DURATION: u32 = 99;

/// Mends allies while alive and empowers them when it falls.
#[derive(Debug)]
pub struct Martyr {
    blessing: SkillDefinition,
}

impl Martyr {
    pub fn new() -> Self {
        Self {
            blessing: SkillDefinition::heal("Sacrifice's Blessing", 20, SkillTargetType::Ally),
        }
    }
}

impl Default for Martyr {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Martyr {
    fn pattern(&self) -> AiPattern {
        AiPattern::Martyr
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        if let Some(wounded) = wounded_ally(&ctx.allies(), MEND_THRESHOLD) {
            return skill_attack(me, wounded, self.blessing.clone());
        }
        let target = ctx.weighted_target(me.element);
        basic_attack(me, target, ctx.rng())
    }

    fn on_unit_died(&mut self, ctx: &mut ReactionContext<'_>, dead: UnitId, _killer: UnitId) {
        let me = ctx.me().id;
        if dead != me {
            return;
        }
        for ally in ctx.living_allies() {
            if ally.id == me {
                continue;
            }
            let amount = (ally.max_hp as f32 * DEATH_HEAL_FRACTION).round() as u32;
            ctx.push(AiEffect::Heal {
                unit: ally.id,
                amount,
            });
            ctx.apply_status(
                ally.id,
                StatusEffectType::AtkUp,
                DEATH_BUFF_DURATION,
                DEATH_ATTACK_MULTIPLIER,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;

    #[test]
    fn blesses_the_weakest_ally_below_half() {
        let field = Field::new(
            vec![unit("hero", 100, 20, 5)],
            vec![unit("martyr", 100, 20, 5), unit("a", 45, 20, 5), unit("b", 30, 20, 5)],
        );
        let (intent, _) = field.decide(&mut Martyr::new(), UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Sacrifice's Blessing"));
        assert_eq!(intent.target, UnitId(3));
        assert_eq!(intent.estimated_damage, 20);
    }

    #[test]
    fn death_heals_and_buffs_surviving_allies() {
        let field = Field::new(
            vec![unit("hero", 100, 20, 5)],
            vec![unit("martyr", 0, 20, 5), unit("a", 50, 20, 5), unit("gone", 0, 20, 5)],
        );
        let mut ai = Martyr::new();

        assert!(field.unit_died(&mut ai, UnitId(1), UnitId(2), UnitId(0)).is_empty());

        let effects = field.unit_died(&mut ai, UnitId(1), UnitId(1), UnitId(0));
        assert_eq!(
            effects,
            vec![
                AiEffect::Heal {
                    unit: UnitId(2),
                    amount: 30,
                },
                AiEffect::ApplyStatus {
                    unit: UnitId(2),
                    kind: StatusEffectType::AtkUp,
                    duration: 99,
                    value: 1.3,
                },
            ]
        );
    }
}
