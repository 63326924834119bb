use crate::ai::targeting::{basic_attack, skill_attack};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, StatusEffectType};

const ENRAGE_THRESHOLD: f32 = 0.25;
const ENRAGE_MULTIPLIER: f32 = 1.5;
const ENRAGE_DURATION: u32 = 99;
const MIN_AGGRESSION: f32 = 0.3;
const MAX_AGGRESSION: f32 = 1.0;

/// Grows more reckless as it loses HP; enrages once at a quarter health.
#[derive(Debug)]
pub struct Berserker {
    enraged: bool,
    rage_strike: SkillDefinition,
}

impl Berserker {
    pub fn new() -> Self {
        Self {
            enraged: false,
            rage_strike: SkillDefinition::strike("Rage Strike", ElementType::None, 2.0),
        }
    }
}

impl Default for Berserker {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Berserker {
    fn pattern(&self) -> AiPattern {
        AiPattern::Berserker
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        let hp = me.hp_fraction();

        if !self.enraged && hp <= ENRAGE_THRESHOLD {
            self.enraged = true;
            ctx.apply_status(me.id, StatusEffectType::AtkUp, ENRAGE_DURATION, ENRAGE_MULTIPLIER);
        }

        let aggression = MIN_AGGRESSION + (MAX_AGGRESSION - MIN_AGGRESSION) * (1.0 - hp);
        let target = ctx.weighted_target(me.element);
        if ctx.rng().unit() < aggression {
            skill_attack(me, target, self.rage_strike.clone())
        } else {
            basic_attack(me, target, ctx.rng())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::AiEffect;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn enrages_exactly_once() {
        let field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("brute", 20, 20, 5)]);
        let mut ai = Berserker::new();
        let me = UnitId(1);

        let (intent, effects) = field.decide(&mut ai, me, &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Rage Strike"));
        assert_eq!(
            effects,
            vec![AiEffect::ApplyStatus {
                unit: me,
                kind: StatusEffectType::AtkUp,
                duration: 99,
                value: 1.5,
            }]
        );

        let (_, effects) = field.decide(&mut ai, me, &mut ScriptedRoller::constant(0.0));
        assert!(effects.is_empty());
    }

    #[test]
    fn healthy_berserker_mostly_basic_attacks() {
        let field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("brute", 100, 20, 5)]);
        let mut ai = Berserker::new();
        // jitter, roll, aggression roll 0.5 > 0.3, unblockable roll
        let mut rng = ScriptedRoller::new([0.0, 0.0, 0.5, 0.9]);
        let (intent, effects) = field.decide(&mut ai, UnitId(1), &mut rng);
        assert!(intent.skill.is_none());
        assert_eq!(intent.target, UnitId(0));
        assert_eq!(intent.estimated_damage, 15);
        assert!(effects.is_empty());
    }
}
