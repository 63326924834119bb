use crate::ai::targeting::{basic_attack, skill_attack};
use crate::ai::{AiContext, AiEffect, AiPattern, EnemyAi, Intent, ReactionContext};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, UnitId};

/// Attack gained per fallen ally.
const ATTACK_PER_STACK: i32 = 5;

/// Grows stronger with every ally that falls.
#[derive(Debug)]
pub struct Avenger {
    stacks: u32,
    vengeance_strike: SkillDefinition,
    wrath_unleashed: SkillDefinition,
}

impl Avenger {
    pub fn new() -> Self {
        Self {
            stacks: 0,
            vengeance_strike: SkillDefinition::strike("Vengeance Strike", ElementType::None, 1.5),
            wrath_unleashed: SkillDefinition::strike("Wrath Unleashed", ElementType::None, 2.5),
        }
    }

    pub fn stacks(&self) -> u32 {
        self.stacks
    }
}

impl Default for Avenger {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Avenger {
    fn pattern(&self) -> AiPattern {
        AiPattern::Avenger
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        let target = ctx.weighted_target(me.element);
        match self.stacks {
            0 => basic_attack(me, target, ctx.rng()),
            1 => skill_attack(me, target, self.vengeance_strike.clone()),
            _ => skill_attack(me, target, self.wrath_unleashed.clone()),
        }
    }

    fn on_unit_died(&mut self, ctx: &mut ReactionContext<'_>, dead: UnitId, _killer: UnitId) {
        let me = ctx.me().id;
        if dead == me || !ctx.is_ally(dead) {
            return;
        }
        self.stacks += 1;
        ctx.push(AiEffect::RaiseAttack {
            unit: me,
            amount: ATTACK_PER_STACK,
        });
    }
}
