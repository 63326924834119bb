use super::advance_rotation;
use crate::ai::targeting::{highest_attack, skill_attack};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent, ReactionContext};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, SkillTargetType, StatusEffectType, UnitId};

const ROTATION_LEN: u8 = 3;
const AURA_MULTIPLIER: f32 = 1.15;
const AURA_DURATION: u32 = 99;

/// Leads with a battle-long aura over its allies and rotates between rallying,
/// marking a target and striking. The aura collapses when the commander falls.
#[derive(Debug)]
pub struct Commander {
    step: u8,
    rally_command: SkillDefinition,
    focus_fire: SkillDefinition,
    commanders_strike: SkillDefinition,
}

impl Commander {
    pub fn new() -> Self {
        Self {
            step: 0,
            rally_command: SkillDefinition::support("Rally Command", SkillTargetType::Ally)
                .with_status(StatusEffectType::AtkUp, 3, 1.25, 1.0),
            focus_fire: SkillDefinition::strike("Focus Fire", ElementType::None, 0.5)
                .with_status(StatusEffectType::DefDown, 2, 0.7, 1.0),
            commanders_strike: SkillDefinition::strike("Commander's Strike", ElementType::None, 1.5),
        }
    }

    fn strike(&self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        let target = ctx.weighted_target(me.element);
        skill_attack(me, target, self.commanders_strike.clone())
    }
}

impl Default for Commander {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Commander {
    fn pattern(&self) -> AiPattern {
        AiPattern::Commander
    }

    fn on_battle_start(&mut self, ctx: &mut ReactionContext<'_>) {
        for ally in ctx.living_allies() {
            ctx.apply_status(ally.id, StatusEffectType::AtkUp, AURA_DURATION, AURA_MULTIPLIER);
            ctx.apply_status(ally.id, StatusEffectType::DefUp, AURA_DURATION, AURA_MULTIPLIER);
        }
    }

    fn on_unit_died(&mut self, ctx: &mut ReactionContext<'_>, dead: UnitId, _killer: UnitId) {
        if dead != ctx.me().id {
            return;
        }
        for ally in ctx.living_allies() {
            ctx.cure_status(ally.id, StatusEffectType::AtkUp);
            ctx.cure_status(ally.id, StatusEffectType::DefUp);
        }
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        match advance_rotation(&mut self.step, ROTATION_LEN) {
            1 => match ctx.random_living_ally() {
                Some(ally) => skill_attack(me, ally, self.rally_command.clone()),
                None => self.strike(ctx),
            },
            2 => {
                let target = highest_attack(ctx.living_players()).unwrap_or(ctx.first_player());
                skill_attack(me, target, self.focus_fire.clone())
            }
            _ => self.strike(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiEffect;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;

    fn field() -> Field {
        Field::new(
            vec![unit("hero", 100, 20, 5), unit("brute", 100, 35, 5)],
            vec![
                unit("commander", 100, 20, 5),
                unit("grunt", 100, 20, 5),
                unit("fallen", 0, 20, 5),
            ],
        )
    }

    #[test]
    fn aura_covers_living_allies_and_collapses_on_death() {
        let field = field();
        let mut ai = Commander::new();

        let start = field.battle_start(&mut ai, UnitId(2));
        assert_eq!(start.len(), 4);
        assert!(start.iter().all(|e| matches!(
            e,
            AiEffect::ApplyStatus { unit, value, duration: 99, .. }
                if (*unit == UnitId(2) || *unit == UnitId(3)) && (*value - 1.15).abs() < 1e-6
        )));

        assert!(field.unit_died(&mut ai, UnitId(2), UnitId(3), UnitId(0)).is_empty());
        let cured = field.unit_died(&mut ai, UnitId(2), UnitId(2), UnitId(0));
        assert!(cured.contains(&AiEffect::CureStatus {
            unit: UnitId(3),
            kind: StatusEffectType::AtkUp,
        }));
        assert!(cured.contains(&AiEffect::CureStatus {
            unit: UnitId(3),
            kind: StatusEffectType::DefUp,
        }));
    }

    #[test]
    fn rotation_rallies_marks_then_strikes() {
        let field = field();
        let mut ai = Commander::new();
        let mut rng = ScriptedRoller::constant(0.0);

        let (rally, _) = field.decide(&mut ai, UnitId(2), &mut rng);
        assert_eq!(rally.skill_name(), Some("Rally Command"));
        assert_eq!(rally.target, UnitId(2));

        let (mark, _) = field.decide(&mut ai, UnitId(2), &mut rng);
        assert_eq!(mark.skill_name(), Some("Focus Fire"));
        assert_eq!(mark.target, UnitId(1));

        let (strike, _) = field.decide(&mut ai, UnitId(2), &mut rng);
        assert_eq!(strike.skill_name(), Some("Commander's Strike"));

        let (again, _) = field.decide(&mut ai, UnitId(2), &mut rng);
        assert_eq!(again.skill_name(), Some("Rally Command"));
    }
}
