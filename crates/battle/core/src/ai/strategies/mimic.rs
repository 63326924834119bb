use crate::ai::targeting::{basic_attack, skill_attack};
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::{ElementType, SkillTargetType};

/// Copies the party's latest skill and plays it back a turn later at no cost.
#[derive(Debug)]
pub struct Mimic {
    copied: Option<SkillDefinition>,
    mirror_strike: SkillDefinition,
}

impl Mimic {
    pub fn new() -> Self {
        Self {
            copied: None,
            mirror_strike: SkillDefinition::strike("Mirror Strike", ElementType::None, 1.0),
        }
    }
}

impl Default for Mimic {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for Mimic {
    fn pattern(&self) -> AiPattern {
        AiPattern::Mimic
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();

        if let Some(skill) = self.copied.take() {
            let target = match skill.target {
                SkillTargetType::Ally => ctx.random_living_ally().unwrap_or(me),
                SkillTargetType::SelfTarget => me,
                SkillTargetType::Enemy => ctx.weighted_target(skill.element),
            };
            return skill_attack(me, target, skill);
        }

        if let Some(observed) = &ctx.memory().last_skill {
            self.copied = Some(copy_of(observed));
            let target = ctx.weighted_target(me.element);
            return basic_attack(me, target, ctx.rng());
        }

        let target = ctx.weighted_target(me.element);
        skill_attack(me, target, self.mirror_strike.clone())
    }
}

/// Free single-target copy of an observed skill. Effects on the party's
/// supplies are not copied.
fn copy_of(observed: &SkillDefinition) -> SkillDefinition {
    SkillDefinition {
        name: observed.name.clone(),
        element: observed.element,
        damage_multiplier: observed.damage_multiplier,
        heal_amount: observed.heal_amount,
        lifesteal: observed.lifesteal,
        target: observed.target,
        status: observed.status,
        ..SkillDefinition::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::{StatusEffectType, UnitId};

    #[test]
    fn mirrors_when_nothing_observed() {
        let field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("mimic", 100, 20, 5)]);
        let (intent, _) = field.decide(&mut Mimic::new(), UnitId(1), &mut ScriptedRoller::constant(0.0));
        assert_eq!(intent.skill_name(), Some("Mirror Strike"));
    }

    #[test]
    fn replays_observed_skill_one_turn_later_for_free() {
        let mut field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("mimic", 100, 20, 5)]);
        field.memory.last_skill = Some(
            SkillDefinition::strike("Lux Bolt", ElementType::Lux, 1.5).with_cost(8),
        );
        let mut ai = Mimic::new();
        let mut rng = ScriptedRoller::constant(0.0);

        let (observing, _) = field.decide(&mut ai, UnitId(1), &mut rng);
        assert!(observing.skill.is_none());

        let (replay, _) = field.decide(&mut ai, UnitId(1), &mut rng);
        let skill = replay.skill.unwrap();
        assert_eq!(skill.name, "Lux Bolt");
        assert_eq!(skill.cost, 0);
        assert_eq!(replay.target, UnitId(0));
    }

    #[test]
    fn copy_drops_area_burn_and_item_destruction() {
        let mut field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("mimic", 100, 20, 5)]);
        field.memory.last_skill = Some(
            SkillDefinition::strike("Cataclysm", ElementType::Ignis, 2.0)
                .with_cost(30)
                .with_status(StatusEffectType::Burn, 3, 4.0, 0.5)
                .with_resource_burn(10)
                .destroying_items()
                .area(),
        );
        let mut ai = Mimic::new();
        let mut rng = ScriptedRoller::constant(0.0);

        field.decide(&mut ai, UnitId(1), &mut rng);
        let (replay, _) = field.decide(&mut ai, UnitId(1), &mut rng);
        let skill = replay.skill.unwrap();
        assert_eq!(skill.name, "Cataclysm");
        assert_eq!(skill.element, ElementType::Ignis);
        assert_eq!(skill.damage_multiplier, 2.0);
        assert_eq!(skill.cost, 0);
        assert!(!skill.area);
        assert_eq!(skill.resource_burn, 0);
        assert!(!skill.destroys_item);
        let rider = skill.status.unwrap();
        assert_eq!(rider.kind, StatusEffectType::Burn);
        assert_eq!(rider.chance, 0.5);
    }

    #[test]
    fn copied_self_skill_targets_the_mimic() {
        let mut field = Field::new(vec![unit("hero", 100, 20, 5)], vec![unit("mimic", 100, 20, 5)]);
        field.memory.last_skill = Some(SkillDefinition::heal("Arcane Shield", 20, SkillTargetType::SelfTarget));
        let mut ai = Mimic::new();
        let mut rng = ScriptedRoller::constant(0.0);

        field.decide(&mut ai, UnitId(1), &mut rng);
        let (replay, _) = field.decide(&mut ai, UnitId(1), &mut rng);
        assert_eq!(replay.target, UnitId(1));
        assert_eq!(replay.estimated_damage, 20);
    }
}
