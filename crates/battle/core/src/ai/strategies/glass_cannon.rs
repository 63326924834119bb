use crate::ai::targeting::skill_attack;
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, StatusEffectType};

/// Always fires its heaviest skill.
#[derive(Debug)]
pub struct GlassCannon {
    obliterate: SkillDefinition,
    devastation_beam: SkillDefinition,
}

impl GlassCannon {
    pub fn new() -> Self {
        Self {
            obliterate: SkillDefinition::strike("Obliterate", ElementType::None, 3.0),
            devastation_beam: SkillDefinition::strike("Devastation Beam", ElementType::Lux, 2.5)
                .with_status(StatusEffectType::Burn, 2, 5.0, 0.3),
        }
    }

    /// Ties go to Obliterate.
    fn heaviest(&self) -> &SkillDefinition {
        if self.obliterate.damage_multiplier >= self.devastation_beam.damage_multiplier {
            &self.obliterate
        } else {
            &self.devastation_beam
        }
    }
}

impl Default for GlassCannon {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for GlassCannon {
    fn pattern(&self) -> AiPattern {
        AiPattern::GlassCannon
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        let target = ctx.weighted_target(me.element);
        skill_attack(me, target, self.heaviest().clone())
    }
}
