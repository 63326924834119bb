use crate::catalog::SkillDefinition;
use crate::state::UnitId;

/// Action an enemy commits to during the intent phase.
///
/// Intents are immutable once declared. The skill is an owned copy carrying
/// whatever multiplier or element the strategy computed for this turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Intent {
    pub target: UnitId,
    /// Breaks through blocks. Only basic attacks roll for this.
    pub unblockable: bool,
    /// Preview shown to the player; heal amount for healing skills.
    pub estimated_damage: u32,
    pub skill: Option<SkillDefinition>,
}

impl Intent {
    pub fn basic(target: UnitId, unblockable: bool, estimated_damage: u32) -> Self {
        Self {
            target,
            unblockable,
            estimated_damage,
            skill: None,
        }
    }

    pub fn with_skill(target: UnitId, estimated_damage: u32, skill: SkillDefinition) -> Self {
        Self {
            target,
            unblockable: false,
            estimated_damage,
            skill: Some(skill),
        }
    }

    /// Placeholder for a unit that will not act this turn.
    pub fn idle(target: UnitId) -> Self {
        Self::basic(target, false, 0)
    }

    /// A new intent identical to this one but aimed at `target`.
    #[must_use]
    pub fn retargeted(&self, target: UnitId) -> Self {
        Self {
            target,
            ..self.clone()
        }
    }

    pub fn skill_name(&self) -> Option<&str> {
        self.skill.as_ref().map(|s| s.name.as_str())
    }
}

/// An intent together with the enemy that declared it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeclaredIntent {
    pub enemy: UnitId,
    pub intent: Intent,
}
