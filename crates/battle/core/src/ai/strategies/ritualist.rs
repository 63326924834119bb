use crate::ai::targeting::skill_attack;
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, SkillTargetType, StatusEffectType};

const CHARGE_TURNS: u32 = 3;

/// Channels for three turns, then unleashes an area burst. Stuns break the
/// channel.
#[derive(Debug)]
pub struct Ritualist {
    charge: u32,
    channeling: SkillDefinition,
    cataclysm: SkillDefinition,
}

impl Ritualist {
    pub fn new() -> Self {
        Self {
            charge: 0,
            channeling: SkillDefinition::support("Channeling", SkillTargetType::SelfTarget),
            cataclysm: SkillDefinition::strike("Cataclysm", ElementType::Umbra, 3.0)
                .with_status(StatusEffectType::Burn, 2, 5.0, 0.5)
                .area(),
        }
    }

    pub fn charge(&self) -> u32 {
        self.charge
    }
}

impl Default for Ritualist {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Ritualist {
    fn pattern(&self) -> AiPattern {
        AiPattern::Ritualist
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        if ctx.is_stunned(me.id) {
            self.charge = 0;
            return Intent::idle(ctx.first_player().id);
        }

        if self.charge >= CHARGE_TURNS {
            self.charge = 0;
            let target = ctx.weighted_target(self.cataclysm.element);
            return skill_attack(me, target, self.cataclysm.clone());
        }

        self.charge += 1;
        skill_attack(me, me, self.channeling.clone())
    }
}
