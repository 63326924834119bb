use crate::ai::targeting::skill_attack;
use crate::ai::{AiContext, AiPattern, EnemyAi, Intent};
use crate::catalog::SkillDefinition;
use crate::state::ElementType;

/// Units whose name contains this marker count as swarm members.
const SWARM_MARKER: &str = "Swarm";
const BONUS_PER_DRONE: f32 = 0.2;

/// Hits harder for every other living swarm member.
#[derive(Debug)]
pub struct SwarmDrone {
    swarm_strike: SkillDefinition,
}

impl SwarmDrone {
    pub fn new() -> Self {
        Self {
            swarm_strike: SkillDefinition::strike("Swarm Strike", ElementType::None, 1.0),
        }
    }
}

impl Default for SwarmDrone {
    fn default() -> Self {
        Self::new()
    }
}

impl EnemyAi for SwarmDrone {
    fn pattern(&self) -> AiPattern {
        AiPattern::SwarmDrone
    }

    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent {
        let me = ctx.me();
        let others = ctx
            .allies()
            .into_iter()
            .filter(|u| u.is_alive() && u.id != me.id && u.name.contains(SWARM_MARKER))
            .count();
        let multiplier = 1.0 + others as f32 * BONUS_PER_DRONE;
        let skill = self.swarm_strike.with_damage_multiplier(multiplier);
        let target = ctx.weighted_target(me.element);
        skill_attack(me, target, skill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::strategies::fixture::{Field, unit};
    use crate::combat::ScriptedRoller;
    use crate::state::UnitId;

    #[test]
    fn multiplier_counts_living_swarm_members() {
        let field = Field::new(
            vec![unit("hero", 100, 20, 5)],
            vec![
                unit("Swarm Drone", 100, 20, 5),
                unit("Swarm Drone", 100, 20, 5),
                unit("Swarm Drone", 0, 20, 5),
                unit("Lone Wolf", 100, 20, 5),
            ],
        );
        let mut ai = SwarmDrone::new();
        let (intent, _) = field.decide(&mut ai, UnitId(1), &mut ScriptedRoller::constant(0.0));
        let skill = intent.skill.unwrap();
        assert!((skill.damage_multiplier - 1.2).abs() < 1e-6);
        assert_eq!(intent.estimated_damage, 18);
        assert_eq!(ai.swarm_strike.damage_multiplier, 1.0);
    }
}
