use crate::ai::targeting::{basic_attack, skill_attack, wounded_ally};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::SkillTargetType;

/// Below this aggression the unit considers healing first.
const CAUTIOUS_BELOW: f32 = 0.7;
const HEAL_THRESHOLD: f32 = 0.4;

/// General-purpose enemy driven by its unit type's skill set and a single
/// aggression scalar in `[0, 1]`.
#[derive(Debug)]
pub struct BasicAi {
    aggression: f32,
    skills: Vec<SkillDefinition>,
}

impl BasicAi {
    pub const DEFAULT_AGGRESSION: f32 = 0.5;

    pub fn new(skills: Vec<SkillDefinition>) -> Self {
        Self {
            aggression: Self::DEFAULT_AGGRESSION,
            skills,
        }
    }

    #[must_use]
    pub fn with_aggression(mut self, aggression: f32) -> Self {
        self.aggression = aggression.clamp(0.0, 1.0);
        self
    }

    fn heal_skill(&self) -> Option<&SkillDefinition> {
        self.skills
            .iter()
            .find(|s| s.heal_amount > 0 && s.target == SkillTargetType::Ally)
    }

    fn buff_skill(&self) -> Option<&SkillDefinition> {
        self.skills.iter().find(|s| s.is_buff())
    }

    fn offensive_skills(&self) -> Vec<&SkillDefinition> {
        self.skills
            .iter()
            .filter(|s| s.is_offensive() && s.target == SkillTargetType::Enemy)
            .collect()
    }
}

impl EnemyAi for BasicAi {
    fn pattern(&self) -> AiPattern {
        AiPattern::Basic
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();

        if self.aggression < CAUTIOUS_BELOW
            && let Some(heal) = self.heal_skill()
            && let Some(wounded) = wounded_ally(&ctx.allies(), HEAL_THRESHOLD)
        {
            return Intent::with_skill(wounded.id, heal.heal_amount, heal.clone());
        }

        if ctx.rng().unit() > self.aggression
            && let Some(buff) = self.buff_skill()
            && let Some(ally) = ctx.random_living_ally()
        {
            return Intent::with_skill(ally.id, 0, buff.clone());
        }

        if !self.skills.is_empty() && ctx.rng().unit() < self.aggression {
            let offensive = self.offensive_skills();
            if !offensive.is_empty() {
                let skill = offensive[ctx.rng().index(offensive.len())].clone();
                let target = ctx.weighted_target(skill.element);
                return skill_attack(me, target, skill);
            }
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
    use crate::state::{ElementType, StatusEffectType, UnitId};

    fn magus_skills() -> Vec<SkillDefinition> {
        vec![
            SkillDefinition::strike("Dark Pulse", ElementType::Umbra, 1.8)
                .with_status(StatusEffectType::AtkDown, 2, 0.75, 0.4),
            SkillDefinition::heal("Shadow Heal", 25, SkillTargetType::Ally),
            SkillDefinition::strike("Lux Blast", ElementType::Lux, 2.0)
                .with_status(StatusEffectType::Burn, 2, 5.0, 0.3),
        ]
    }

    #[test]
    fn cautious_unit_heals_badly_wounded_ally() {
        let field = Field::new(
            vec![unit("hero", 100, 20, 5)],
            vec![unit("caster", 100, 20, 5), unit("hurt", 30, 20, 5)],
        );
        let mut ai = BasicAi::new(magus_skills());
        let (intent, _) = field.decide(&mut ai, UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Shadow Heal"));
        assert_eq!(intent.target, UnitId(2));
        assert_eq!(intent.estimated_damage, 25);
    }

    #[test]
    fn knight_buffs_when_roll_exceeds_aggression() {
        let skills = vec![
            SkillDefinition::strike("Heavy Swing", ElementType::None, 2.0)
                .with_status(StatusEffectType::Stun, 1, 0.0, 0.2),
            SkillDefinition::support("War Cry", SkillTargetType::Ally)
                .with_status(StatusEffectType::AtkUp, 2, 1.25, 1.0),
        ];
        let field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("knight", 100, 20, 5)]);
        let mut ai = BasicAi::new(skills);

        let (intent, _) = field.decide(&mut ai, UnitId(1), &mut ScriptedRoller::new([0.9, 0.0]));
        assert_eq!(intent.skill_name(), Some("War Cry"));
        assert_eq!(intent.target, UnitId(1));
        assert_eq!(intent.estimated_damage, 0);

        // buff roll fails, offense roll passes, first offensive skill
        let (intent, _) = field.decide(&mut ai, UnitId(1), &mut ScriptedRoller::new([0.1, 0.1, 0.0]));
        assert_eq!(intent.skill_name(), Some("Heavy Swing"));
    }

    #[test]
    fn without_skills_falls_back_to_basic_attack() {
        let field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("slime", 100, 20, 5)]);
        let mut ai = BasicAi::new(Vec::new());
        let (intent, _) = field.decide(&mut ai, UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert!(intent.skill.is_none());
        assert_eq!(intent.target, UnitId(0));
    }
}
