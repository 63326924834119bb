use crate::ai::targeting::{basic_attack, lowest_defense, skill_attack};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::ElementType;

const PIERCING_SHOT_CHANCE: f32 = 0.7;

/// Always picks on the softest armor.
#[derive(Debug)]
pub struct Sniper {
    piercing_shot: SkillDefinition,
}

impl Sniper {
    pub fn new() -> Self {
        Self {
            piercing_shot: SkillDefinition::strike("Piercing Shot", ElementType::Ventus, 2.5),
        }
    }
}

impl Default for Sniper {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Sniper {
    fn pattern(&self) -> AiPattern {
        AiPattern::Sniper
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        let target = lowest_defense(ctx.living_players()).unwrap_or(ctx.first_player());
        if ctx.rng().chance(PIERCING_SHOT_CHANCE) {
            skill_attack(me, target, self.piercing_shot.clone())
        } else {
            basic_attack(me, target, ctx.rng())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn targets_lowest_defense() {
        let field = Field::new(
            vec![unit("tank", 100, 10, 12), unit("mage", 100, 10, 3)],
            vec![unit("sniper", 100, 20, 5)],
        );
        let mut ai = Sniper::new();

        let (intent, _) = field.decide(&mut ai, UnitId(2), &mut ScriptedRoller::constant(0.1));
        assert_eq!(intent.target, UnitId(1));
        assert_eq!(intent.skill_name(), Some("Piercing Shot"));
        assert_eq!(intent.estimated_damage, 43);

        let (intent, _) = field.decide(&mut ai, UnitId(2), &mut ScriptedRoller::constant(0.7));
        assert_eq!(intent.target, UnitId(1));
        assert!(intent.skill.is_none());
    }
}
