//! Retreat policy for a battle.

use crate::combat::Roller;

/// Whether and how easily the party may flee.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RetreatPolicy {
    pub flee_chance: f32,
    /// Boss battles refuse ordinary flee attempts. Escape items still work.
    pub boss: bool,
}

/// Outcome of a retreat attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetreatResult {
    Escaped,
    Failed,
}

impl RetreatPolicy {
    pub const DEFAULT_FLEE_CHANCE: f32 = 0.75;

    pub fn new(flee_chance: f32) -> Self {
        Self {
            flee_chance,
            boss: false,
        }
    }

    pub fn boss() -> Self {
        Self {
            boss: true,
            ..Self::default()
        }
    }

    pub fn can_retreat(&self) -> bool {
        !self.boss
    }

    /// Rolls a retreat. `guaranteed` attempts (escape items) always succeed.
    pub fn try_retreat(&self, guaranteed: bool, rng: &mut dyn Roller) -> RetreatResult {
        if guaranteed {
            return RetreatResult::Escaped;
        }
        if self.boss {
            return RetreatResult::Failed;
        }
        if rng.unit() < self.flee_chance {
            RetreatResult::Escaped
        } else {
            RetreatResult::Failed
        }
    }
}

impl Default for RetreatPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_FLEE_CHANCE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ScriptedRoller;

    #[test]
    fn roll_against_flee_chance() {
        let policy = RetreatPolicy::default();
        let mut rng = ScriptedRoller::new([0.74, 0.75]);
        assert_eq!(policy.try_retreat(false, &mut rng), RetreatResult::Escaped);
        assert_eq!(policy.try_retreat(false, &mut rng), RetreatResult::Failed);
    }

    #[test]
    fn bosses_only_yield_to_guaranteed_escapes() {
        let policy = RetreatPolicy::boss();
        let mut rng = ScriptedRoller::constant(0.0);
        assert!(!policy.can_retreat());
        assert_eq!(policy.try_retreat(false, &mut rng), RetreatResult::Failed);
        assert_eq!(policy.try_retreat(true, &mut rng), RetreatResult::Escaped);
    }
}
