use crate::ai::targeting::basic_attack;
use crate::ai::{AiContext, AiEffect, AiPattern, EnemyAi, Intent};

const FLEE_THRESHOLD: f32 = 0.3;

/// Fights until badly hurt, then runs. A fled coward is not a kill.
#[derive(Debug, Default)]
pub struct Coward;

impl Coward {
    pub fn new() -> Self {
        Self
    }
}

impl EnemyAi for Coward {
    fn pattern(&self) -> AiPattern {
        AiPattern::Coward
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        if me.hp_fraction() <= FLEE_THRESHOLD {
            ctx.push(AiEffect::Flee { unit: me.id });
            return Intent::idle(ctx.first_player().id);
        }
        let target = ctx.weighted_target(me.element);
        basic_attack(me, target, ctx.rng())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn flees_at_thirty_percent() {
        let field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("coward", 30, 20, 5)]);
        let (intent, effects) = field.decide(&mut Coward::new(), UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert_eq!(effects, vec![AiEffect::Flee { unit: UnitId(1) }]);
        assert_eq!(intent.estimated_damage, 0);

        let field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("coward", 31, 20, 5)]);
        let (intent, effects) = field.decide(&mut Coward::new(), UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert!(effects.is_empty());
        assert_eq!(intent.estimated_damage, 15);
    }
}
