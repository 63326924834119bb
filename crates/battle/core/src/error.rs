//! Common error infrastructure for battle-core.
//!
//! Two families exist:
//!
//! - [`SetupError`]: the battle cannot start (empty rosters, missing AI
//!   bindings, bad configuration). Nothing is partially started.
//! - [`InputError`]: a player command was rejected. State is unchanged and
//!   the caller may retry after consulting the `can_perform` query.
//!
//! AI contract violations and mid-turn deaths are not errors; the engine
//! recovers from them through its retarget and skip rules.

use crate::state::{BattleState, UnitId};

/// Severity level of an error, used for logging priority and recovery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Retrying later (e.g. once input opens) may succeed.
    Recoverable,

    /// Invalid input; retrying unchanged will fail again.
    Validation,

    /// Configuration that prevents the battle from starting.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }
}

/// Common trait for all battle-core errors.
pub trait BattleError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    /// Stable identifier of the error variant, for logs and tests.
    fn error_code(&self) -> &'static str;
}

/// Reasons a battle refuses to start.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum SetupError {
    #[error("player party is empty")]
    EmptyParty,

    #[error("enemy roster is empty")]
    EmptyEnemies,

    #[error("{units} enemy units but {bindings} AI bindings")]
    AiBindingMismatch { units: usize, bindings: usize },

    #[error("invalid config field `{field}`: {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}

impl BattleError for SetupError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyParty => "SETUP_EMPTY_PARTY",
            Self::EmptyEnemies => "SETUP_EMPTY_ENEMIES",
            Self::AiBindingMismatch { .. } => "SETUP_AI_BINDING_MISMATCH",
            Self::InvalidConfig { .. } => "SETUP_INVALID_CONFIG",
        }
    }
}

/// Reasons a player command was rejected.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum InputError {
    #[error("input is not accepted right now (state {state})")]
    NotAcceptingInput { state: BattleState },

    #[error("action needs {required} action points, {available} left")]
    InsufficientActionPoints { required: u8, available: u8 },

    #[error("no skill at index {index}")]
    InvalidSkillIndex { index: usize },

    #[error("no item at index {index}")]
    InvalidItemIndex { index: usize },

    #[error("item slot {index} is empty")]
    ItemOutOfStock { index: usize },

    #[error("skill costs {cost}, only {available} available")]
    InsufficientResource { cost: u32, available: u32 },

    #[error("invalid target {target:?}")]
    InvalidTarget { target: Option<UnitId> },

    #[error("a defensive stance is already set this turn")]
    StanceAlreadySet,

    #[error("retreat is not available in this battle")]
    RetreatUnavailable,

    #[error("retreat is blocked in boss battles")]
    RetreatBlocked,
}

impl BattleError for InputError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NotAcceptingInput { .. } => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotAcceptingInput { .. } => "INPUT_NOT_ACCEPTING",
            Self::InsufficientActionPoints { .. } => "INPUT_INSUFFICIENT_AP",
            Self::InvalidSkillIndex { .. } => "INPUT_INVALID_SKILL",
            Self::InvalidItemIndex { .. } => "INPUT_INVALID_ITEM",
            Self::ItemOutOfStock { .. } => "INPUT_ITEM_OUT_OF_STOCK",
            Self::InsufficientResource { .. } => "INPUT_INSUFFICIENT_RESOURCE",
            Self::InvalidTarget { .. } => "INPUT_INVALID_TARGET",
            Self::StanceAlreadySet => "INPUT_STANCE_ALREADY_SET",
            Self::RetreatUnavailable => "INPUT_RETREAT_UNAVAILABLE",
            Self::RetreatBlocked => "INPUT_RETREAT_BLOCKED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_errors_are_fatal() {
        let err = SetupError::AiBindingMismatch {
            units: 2,
            bindings: 1,
        };
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.to_string(), "2 enemy units but 1 AI bindings");
    }

    #[test]
    fn closed_input_is_recoverable() {
        let err = InputError::NotAcceptingInput {
            state: BattleState::EnemyTurn,
        };
        assert!(err.severity().is_recoverable());
        assert!(!InputError::StanceAlreadySet.severity().is_recoverable());
    }
}
