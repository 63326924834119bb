use crate::ai::targeting::skill_attack;
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent, RedirectView};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, SkillTargetType, StatusEffectType, UnitId};

/// Allies below this HP fraction have hits aimed at them taken by the bodyguard.
const PROTECT_THRESHOLD: f32 = 0.4;
const FORTIFY_CHANCE: f32 = 0.3;

/// Shields wounded allies by stepping in front of attacks aimed at them.
#[derive(Debug)]
pub struct Bodyguard {
    fortify: SkillDefinition,
    guardian_strike: SkillDefinition,
}

impl Bodyguard {
    pub fn new() -> Self {
        Self {
            fortify: SkillDefinition::support("Fortify", SkillTargetType::SelfTarget)
                .with_status(StatusEffectType::DefUp, 2, 1.5, 1.0),
            guardian_strike: SkillDefinition::strike("Guardian Strike", ElementType::None, 1.2),
        }
    }
}

impl Default for Bodyguard {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Bodyguard {
    fn pattern(&self) -> AiPattern {
        AiPattern::Bodyguard
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        if ctx.rng().chance(FORTIFY_CHANCE) {
            return skill_attack(me, me, self.fortify.clone());
        }
        let target = ctx.weighted_target(me.element);
        skill_attack(me, target, self.guardian_strike.clone())
    }

    fn redirect_attack(
        &self,
        view: &RedirectView<'_>,
        _attacker: UnitId,
        target: UnitId,
    ) -> Option<UnitId> {
        if !view.me.is_alive() || target == view.me.id {
            return None;
        }
        let protected = view.roster.get(target)?;
        if protected.side != view.me.side || protected.hp_fraction() >= PROTECT_THRESHOLD {
            return None;
        }
        Some(view.me.id)
    }
}
