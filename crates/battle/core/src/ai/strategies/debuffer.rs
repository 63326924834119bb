use super::advance_rotation;
use crate::ai::targeting::{highest_attack, highest_defense, is_debuffed, skill_attack};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, StatusEffectType};

const ROTATION_LEN: u8 = 5;

/// Five-step rotation: weaken attack, rend armor, then three exploiting hits
/// that prefer already debuffed players.
#[derive(Debug)]
pub struct Debuffer {
    step: u8,
    weakening_hex: SkillDefinition,
    armor_rend: SkillDefinition,
    exploit_opening: SkillDefinition,
}

impl Debuffer {
    pub fn new() -> Self {
        Self {
            step: 0,
            weakening_hex: SkillDefinition::strike("Weakening Hex", ElementType::Umbra, 0.5)
                .with_status(StatusEffectType::AtkDown, 3, 0.7, 1.0),
            armor_rend: SkillDefinition::strike("Armor Rend", ElementType::None, 0.5)
                .with_status(StatusEffectType::DefDown, 3, 0.7, 1.0),
            exploit_opening: SkillDefinition::strike("Exploit Opening", ElementType::Umbra, 2.0),
        }
    }
}

impl Default for Debuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Debuffer {
    fn pattern(&self) -> AiPattern {
        AiPattern::Debuffer
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        match advance_rotation(&mut self.step, ROTATION_LEN) {
            1 => {
                let target = highest_attack(ctx.living_players()).unwrap_or(ctx.first_player());
                skill_attack(me, target, self.weakening_hex.clone())
            }
            2 => {
                let target = highest_defense(ctx.living_players()).unwrap_or(ctx.first_player());
                skill_attack(me, target, self.armor_rend.clone())
            }
            _ => {
                let debuffed = ctx
                    .living_players()
                    .iter()
                    .copied()
                    .find(|p| is_debuffed(ctx.status_effects(p.id)));
                let target = match debuffed {
                    Some(target) => target,
                    None => ctx.weighted_target(self.exploit_opening.element),
                };
                skill_attack(me, target, self.exploit_opening.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn rotation_cycles_every_five_turns() {
        let mut field = Field::new(
            vec![unit("striker", 100, 30, 2), unit("wall", 100, 10, 12)],
            vec![unit("hexer", 100, 20, 5)],
        );
        field.statuses.apply(UnitId(1), StatusEffectType::DefDown, 3, 0.7);
        let mut ai = Debuffer::new();
        let mut rng = ScriptedRoller::constant(0.0);

        let names: Vec<(String, UnitId)> = (0..6)
            .map(|_| {
                let (intent, _) = field.decide(&mut ai, UnitId(2), &mut rng);
                (intent.skill_name().unwrap_or_default().to_string(), intent.target)
            })
            .collect();

        assert_eq!(names[0], ("Weakening Hex".to_string(), UnitId(0)));
        assert_eq!(names[1], ("Armor Rend".to_string(), UnitId(1)));
        for turn in &names[2..5] {
            assert_eq!(turn, &("Exploit Opening".to_string(), UnitId(1)));
        }
        assert_eq!(names[5].0, "Weakening Hex");
    }
}
