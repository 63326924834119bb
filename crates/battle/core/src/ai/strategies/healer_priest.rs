use crate::ai::targeting::{skill_attack, wounded_ally};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, SkillTargetType};

/// Heals any ally missing HP; only attacks when everyone is topped up.
#[derive(Debug)]
pub struct HealerPriest {
    benediction: SkillDefinition,
    sanctified_strike: SkillDefinition,
}

impl HealerPriest {
    pub fn new() -> Self {
        Self {
            benediction: SkillDefinition::heal("Benediction", 40, SkillTargetType::Ally),
            sanctified_strike: SkillDefinition::strike("Sanctified Strike", ElementType::Lux, 1.0),
        }
    }
}

impl Default for HealerPriest {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for HealerPriest {
    fn pattern(&self) -> AiPattern {
        AiPattern::HealerPriest
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        if let Some(wounded) = wounded_ally(&ctx.allies(), 1.0) {
            return skill_attack(me, wounded, self.benediction.clone());
        }
        let target = ctx.weighted_target(self.sanctified_strike.element);
        skill_attack(me, target, self.sanctified_strike.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn any_missing_hp_triggers_a_heal() {
        let field = Field::new(
            vec![unit("hero", 100, 20, 5)],
            vec![unit("priest", 100, 20, 5), unit("grunt", 99, 20, 5)],
        );
        let (intent, _) = field.decide(&mut HealerPriest::new(), UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Benediction"));
        assert_eq!(intent.target, UnitId(2));
        assert_eq!(intent.estimated_damage, 40);
    }

    #[test]
    fn attacks_when_nobody_is_hurt() {
        let field = Field::new(
            vec![unit("hero", 100, 20, 5)],
            vec![unit("priest", 100, 20, 5)],
        );
        let (intent, _) = field.decide(&mut HealerPriest::new(), UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Sanctified Strike"));
        assert_eq!(intent.target, UnitId(0));
    }
}
