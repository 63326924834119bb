use crate::ai::targeting::{highest_hp, skill_attack};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::ElementType;

const FEAST_THRESHOLD: f32 = 0.5;

/// Drains the healthiest player; feeds harder when wounded.
#[derive(Debug)]
pub struct Vampire {
    blood_drain: SkillDefinition,
    crimson_feast: SkillDefinition,
}

impl Vampire {
    pub fn new() -> Self {
        Self {
            blood_drain: SkillDefinition::strike("Blood Drain", ElementType::Umbra, 1.5)
                .with_lifesteal(0.5),
            crimson_feast: SkillDefinition::strike("Crimson Feast", ElementType::Umbra, 2.0)
                .with_lifesteal(0.75),
        }
    }
}

impl Default for Vampire {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Vampire {
    fn pattern(&self) -> AiPattern {
        AiPattern::Vampire
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        let target = highest_hp(ctx.living_players()).unwrap_or(ctx.first_player());
        let skill = if me.hp_fraction() < FEAST_THRESHOLD {
            &self.crimson_feast
        } else {
            &self.blood_drain
        };
        skill_attack(me, target, skill.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn feasts_below_half_health() {
        let party = vec![unit("thin", 40, 20, 5), unit("stout", 90, 20, 5)];

        let field = Field::new(party.clone(), vec![unit("count", 50, 20, 5)]);
        let (intent, _) = field.decide(&mut Vampire::new(), UnitId(2), &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Blood Drain"));
        assert_eq!(intent.target, UnitId(1));

        let field = Field::new(party, vec![unit("count", 49, 20, 5)]);
        let (intent, _) = field.decide(&mut Vampire::new(), UnitId(2), &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Crimson Feast"));
        assert_eq!(intent.skill.unwrap().lifesteal, 0.75);
    }
}
