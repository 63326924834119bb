use crate::ai::targeting::{highest_attack, skill_attack, weakness_target};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, StatusEffectType};

/// Opens by suppressing the strongest attacker, then hunts elemental weaknesses.
#[derive(Debug)]
pub struct Tactician {
    opened: bool,
    suppressing_strike: SkillDefinition,
    exploit_weakness: SkillDefinition,
}

impl Tactician {
    pub fn new() -> Self {
        Self {
            opened: false,
            suppressing_strike: SkillDefinition::strike("Suppressing Strike", ElementType::None, 1.0)
                .with_status(StatusEffectType::AtkDown, 2, 0.75, 1.0),
            exploit_weakness: SkillDefinition::strike("Exploit Weakness", ElementType::None, 1.8),
        }
    }
}

impl Default for Tactician {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Tactician {
    fn pattern(&self) -> AiPattern {
        AiPattern::Tactician
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        if !self.opened {
            self.opened = true;
            let target = highest_attack(ctx.living_players()).unwrap_or(ctx.first_player());
            return skill_attack(me, target, self.suppressing_strike.clone());
        }

        let skill = self.exploit_weakness.with_element(me.element);
        let target = match weakness_target(ctx.living_players(), me.element) {
            Some(target) => target,
            None => ctx.weighted_target(me.element),
        };
        skill_attack(me, target, skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn debuffs_first_then_exploits() {
        let field = Field::new(
            vec![
                unit("rogue", 100, 15, 5),
                unit("brute", 100, 30, 5).with_element(ElementType::Terra),
            ],
            vec![unit("tactician", 100, 20, 5).with_element(ElementType::Ventus)],
        );
        let mut ai = Tactician::new();
        let mut rng = ScriptedRoller::constant(0.0);

        let (opening, _) = field.decide(&mut ai, UnitId(2), &mut rng);
        assert_eq!(opening.skill_name(), Some("Suppressing Strike"));
        assert_eq!(opening.target, UnitId(1));

        let (follow_up, _) = field.decide(&mut ai, UnitId(2), &mut rng);
        let skill = follow_up.skill.unwrap();
        assert_eq!(skill.name, "Exploit Weakness");
        assert_eq!(skill.element, ElementType::Ventus);
        assert_eq!(follow_up.target, UnitId(1));
        // the template keeps its neutral element
        assert_eq!(ai.exploit_weakness.element, ElementType::None);
    }
}
