//! Small value types shared by every battle subsystem.

/// Dense identifier of a unit inside one battle roster.
///
/// Party members are numbered first, enemies follow in roster order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitId(pub u16);

impl UnitId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for UnitId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Which side of the battle a unit fights for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum Side {
    Party,
    Enemy,
}

impl Side {
    pub const fn opposing(self) -> Self {
        match self {
            Self::Party => Self::Enemy,
            Self::Enemy => Self::Party,
        }
    }
}

/// Elemental affinity of units, skills and items.
///
/// The four classical elements form a cycle (Ignis > Ventus > Terra > Aqua >
/// Ignis) while Lux and Umbra are mutually strong against each other.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ElementType {
    #[default]
    None,
    Ignis,
    Aqua,
    Terra,
    Ventus,
    Lux,
    Umbra,
}

/// Class archetype of a unit. Drives default skill sets and resource labels.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum UnitType {
    #[default]
    Knight,
    Alchemist,
    Magus,
}

/// Kinds of timed status effects.
///
/// `None` is an inert marker used by skills without a status rider; applying
/// it is a no-op.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatusEffectType {
    #[default]
    None,
    Poison,
    Burn,
    Stun,
    AtkUp,
    AtkDown,
    DefUp,
    DefDown,
}

impl StatusEffectType {
    /// Number of real (non-`None`) effect kinds. Bounds per-unit storage.
    pub const COUNT: usize = 7;

    /// Damage-over-time effects tick for damage at turn end.
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Poison | Self::Burn)
    }

    pub const fn modifies_attack(self) -> bool {
        matches!(self, Self::AtkUp | Self::AtkDown)
    }

    pub const fn modifies_defense(self) -> bool {
        matches!(self, Self::DefUp | Self::DefDown)
    }

    pub const fn is_buff(self) -> bool {
        matches!(self, Self::AtkUp | Self::DefUp)
    }
}

/// Who a skill or item is aimed at.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SkillTargetType {
    #[default]
    Enemy,
    Ally,
    #[strum(serialize = "self")]
    #[cfg_attr(feature = "serde", serde(rename = "Self"))]
    SelfTarget,
}

/// Defensive posture a party member commits to for the coming enemy phase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum DefensiveStance {
    #[default]
    None,
    Blocking,
    Dodging,
}

/// Top-level phase of the battle state machine.
///
/// `None → BattleStart → [EnemyIntent → PlayerTurn → EnemyTurn → TurnEnd]* →
/// BattleWon | BattleLost`. The two terminal states are absorbing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleState {
    #[default]
    None,
    BattleStart,
    PlayerTurn,
    EnemyIntent,
    EnemyTurn,
    TurnEnd,
    BattleWon,
    BattleLost,
}

impl BattleState {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::BattleWon | Self::BattleLost)
    }
}

/// Actions offered to the active party member.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PlayerAction {
    Attack,
    Skill,
    Item,
    Block,
    Dodge,
    Scan,
    Flee,
}

impl PlayerAction {
    /// Actions that spend every remaining action point and end the member's turn.
    pub const fn consumes_all_points(self) -> bool {
        matches!(self, Self::Block | Self::Dodge | Self::Flee)
    }
}

/// How a battle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum BattleOutcome {
    Won,
    Lost,
    /// The party escaped. No win or loss is recorded.
    Retreated,
    /// Torn down externally before reaching a terminal state.
    Aborted,
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;

    #[test]
    fn element_parses_case_insensitively() {
        assert_eq!(ElementType::from_str("IGNIS").unwrap(), ElementType::Ignis);
        assert_eq!(ElementType::Umbra.as_ref(), "umbra");
    }

    #[test]
    fn only_won_and_lost_are_terminal() {
        assert!(BattleState::BattleWon.is_terminal());
        assert!(BattleState::BattleLost.is_terminal());
        assert!(!BattleState::TurnEnd.is_terminal());
        assert!(!BattleState::None.is_terminal());
    }

    #[test]
    fn self_target_uses_keyword_spelling() {
        assert_eq!(
            SkillTargetType::from_str("self").unwrap(),
            SkillTargetType::SelfTarget
        );
    }
}
