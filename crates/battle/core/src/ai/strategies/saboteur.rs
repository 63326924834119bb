use super::advance_rotation;
use crate::ai::targeting::{highest_resource, lowest_hp_fraction, skill_attack};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::ElementType;

const ROTATION_LEN: u8 = 3;

/// Drains resources, wrecks supplies, then finishes off the weakest.
#[derive(Debug)]
pub struct Saboteur {
    step: u8,
    mana_burn: SkillDefinition,
    corrosive_touch: SkillDefinition,
    sabotage_strike: SkillDefinition,
}

impl Saboteur {
    pub fn new() -> Self {
        Self {
            step: 0,
            mana_burn: SkillDefinition::strike("Mana Burn", ElementType::Umbra, 0.5)
                .with_resource_burn(5),
            corrosive_touch: SkillDefinition::strike("Corrosive Touch", ElementType::None, 0.5)
                .destroying_items(),
            sabotage_strike: SkillDefinition::strike("Sabotage Strike", ElementType::None, 1.5),
        }
    }
}

impl Default for Saboteur {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Saboteur {
    fn pattern(&self) -> AiPattern {
        AiPattern::Saboteur
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        match advance_rotation(&mut self.step, ROTATION_LEN) {
            1 => {
                let target = highest_resource(ctx.living_players()).unwrap_or(ctx.first_player());
                skill_attack(me, target, self.mana_burn.clone())
            }
            2 => {
                let count = ctx.living_players().len();
                let pick = ctx.rng().index(count);
                let target = ctx.living_players()[pick];
                skill_attack(me, target, self.corrosive_touch.clone())
            }
            _ => {
                let target = lowest_hp_fraction(ctx.living_players()).unwrap_or(ctx.first_player());
                skill_attack(me, target, self.sabotage_strike.clone())
            }
        }
    }
}
