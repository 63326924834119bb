use crate::ai::targeting::{skill_attack, weakness_target};
use crate::ai::{AiContext, AiEffect, AiPattern, EnemyAi, Intent, ReactionContext};
use crate::catalog::SkillDefinition;
use crate::combat::resistant_element;
use crate::state::ElementType;

const STARTING_ELEMENT: ElementType = ElementType::Ignis;
const SHIFT_INTERVAL: u32 = 2;

/// Re-attunes every other turn to resist whatever the party last hit with.
#[derive(Debug)]
pub struct ElementalShifter {
    turns_since_shift: u32,
    current: ElementType,
    elemental_blast: SkillDefinition,
}

impl ElementalShifter {
    pub fn new() -> Self {
        Self {
            turns_since_shift: 0,
            current: STARTING_ELEMENT,
            elemental_blast: SkillDefinition::strike("Elemental Blast", ElementType::None, 1.8),
        }
    }

    pub fn current_element(&self) -> ElementType {
        self.current
    }
}

impl Default for ElementalShifter {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for ElementalShifter {
    fn pattern(&self) -> AiPattern {
        AiPattern::ElementalShifter
    }

    fn on_battle_start(&mut self, ctx: &mut ReactionContext<'_>) {
        let me = ctx.me().id;
        ctx.push(AiEffect::SetElement {
            unit: me,
            element: self.current,
        });
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        self.turns_since_shift += 1;
        if self.turns_since_shift >= SHIFT_INTERVAL {
            self.turns_since_shift = 0;
            self.current = resistant_element(ctx.memory().last_attack_element);
            ctx.push(AiEffect::SetElement {
                unit: me.id,
                element: self.current,
            });
        }

        let skill = self.elemental_blast.with_element(self.current);
        let target = match weakness_target(ctx.living_players(), self.current) {
            Some(target) => target,
            None => ctx.weighted_target(self.current),
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
    fn starts_as_ignis_and_shifts_every_second_turn() {
        let mut field = Field::new(
            vec![
                unit("knight", 100, 20, 5),
                unit("wind", 100, 20, 5).with_element(ElementType::Ventus),
            ],
            vec![unit("shifter", 100, 20, 5)],
        );
        let mut ai = ElementalShifter::new();
        let mut rng = ScriptedRoller::constant(0.0);

        assert_eq!(
            field.battle_start(&mut ai, UnitId(2)),
            vec![AiEffect::SetElement {
                unit: UnitId(2),
                element: ElementType::Ignis,
            }]
        );

        let (first, effects) = field.decide(&mut ai, UnitId(2), &mut rng);
        assert!(effects.is_empty());
        assert_eq!(first.skill.unwrap().element, ElementType::Ignis);
        assert_eq!(first.target, UnitId(1));

        field.memory.last_attack_element = ElementType::Lux;
        let (second, effects) = field.decide(&mut ai, UnitId(2), &mut rng);
        assert_eq!(
            effects,
            vec![AiEffect::SetElement {
                unit: UnitId(2),
                element: ElementType::Umbra,
            }]
        );
        assert_eq!(second.skill.unwrap().element, ElementType::Umbra);
        assert_eq!(ai.current_element(), ElementType::Umbra);
        assert_eq!(ai.elemental_blast.element, ElementType::None);
    }
}
