//! Outbound notifications emitted by the battle engine.
//!
//! The engine queues events in emission order; consumers drain them after
//! every engine call. Units are referenced by [`UnitId`] and resolved against
//! the roster in a snapshot when names are needed.

use crate::state::{
    BattleState, DefensiveStance, PlayerAction, StatusEffectType, UnitId,
};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BattleEvent {
    StateChanged {
        previous: BattleState,
        current: BattleState,
    },
    BattleStarted,
    TurnStarted {
        turn: u32,
    },
    TurnEnded {
        turn: u32,
    },

    EnemyIntentDeclared {
        enemy: UnitId,
        target: UnitId,
        unblockable: bool,
        estimated_damage: u32,
        skill: Option<String>,
    },
    EnemyIntentsCleared,
    EnemyActionStarted {
        enemy: UnitId,
        target: UnitId,
    },
    EnemyTurnEnded,

    PlayerTurnStarted {
        unit: UnitId,
        action_points: u8,
    },
    PlayerTurnEnded,
    PlayerActionSelected {
        unit: UnitId,
        action: PlayerAction,
        target: Option<UnitId>,
    },
    ActionPointsChanged {
        remaining: u8,
    },
    PlayerInputChanged {
        enabled: bool,
    },
    DefensiveStanceChanged {
        unit: UnitId,
        stance: DefensiveStance,
    },

    AttackExecuted {
        attacker: UnitId,
        target: UnitId,
        raw_damage: u32,
    },
    AttackRedirected {
        original: UnitId,
        redirected_to: UnitId,
    },
    DamageTaken {
        unit: UnitId,
        source: UnitId,
        amount: u32,
    },
    CriticalHit {
        attacker: UnitId,
        target: UnitId,
    },
    DodgeSucceeded {
        unit: UnitId,
    },
    DodgeFailed {
        unit: UnitId,
    },
    BlockSucceeded {
        unit: UnitId,
        damage: u32,
    },
    BlockBypassed {
        unit: UnitId,
    },
    HealApplied {
        unit: UnitId,
        amount: u32,
    },
    ResourceRestored {
        unit: UnitId,
        amount: u32,
    },
    ResourceBurned {
        unit: UnitId,
        amount: u32,
    },
    ItemDestroyed {
        item: String,
    },

    /// HP reached zero. Damage-over-time kills name the unit as its own killer.
    UnitDied {
        unit: UnitId,
        killer: UnitId,
    },
    /// The unit left the battle alive. Never paired with `UnitDied`.
    UnitFled {
        unit: UnitId,
    },
    UnitRevived {
        unit: UnitId,
        hp: u32,
    },

    StatusEffectApplied {
        unit: UnitId,
        effect: StatusEffectType,
        duration: u32,
    },
    StatusEffectTicked {
        unit: UnitId,
        effect: StatusEffectType,
        damage: u32,
    },
    StatusEffectExpired {
        unit: UnitId,
        effect: StatusEffectType,
    },
    StunSkipped {
        unit: UnitId,
    },

    ScanCompleted {
        scanner: UnitId,
        target: UnitId,
    },
    RetreatFailed,
    BattleWon,
    BattleLost,
    BattleRetreated,
}

impl BattleEvent {
    /// Short stable name, used for log fields.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::StateChanged { .. } => "state_changed",
            Self::BattleStarted => "battle_started",
            Self::TurnStarted { .. } => "turn_started",
            Self::TurnEnded { .. } => "turn_ended",
            Self::EnemyIntentDeclared { .. } => "enemy_intent_declared",
            Self::EnemyIntentsCleared => "enemy_intents_cleared",
            Self::EnemyActionStarted { .. } => "enemy_action_started",
            Self::EnemyTurnEnded => "enemy_turn_ended",
            Self::PlayerTurnStarted { .. } => "player_turn_started",
            Self::PlayerTurnEnded => "player_turn_ended",
            Self::PlayerActionSelected { .. } => "player_action_selected",
            Self::ActionPointsChanged { .. } => "action_points_changed",
            Self::PlayerInputChanged { .. } => "player_input_changed",
            Self::DefensiveStanceChanged { .. } => "defensive_stance_changed",
            Self::AttackExecuted { .. } => "attack_executed",
            Self::AttackRedirected { .. } => "attack_redirected",
            Self::DamageTaken { .. } => "damage_taken",
            Self::CriticalHit { .. } => "critical_hit",
            Self::DodgeSucceeded { .. } => "dodge_succeeded",
            Self::DodgeFailed { .. } => "dodge_failed",
            Self::BlockSucceeded { .. } => "block_succeeded",
            Self::BlockBypassed { .. } => "block_bypassed",
            Self::HealApplied { .. } => "heal_applied",
            Self::ResourceRestored { .. } => "resource_restored",
            Self::ResourceBurned { .. } => "resource_burned",
            Self::ItemDestroyed { .. } => "item_destroyed",
            Self::UnitDied { .. } => "unit_died",
            Self::UnitFled { .. } => "unit_fled",
            Self::UnitRevived { .. } => "unit_revived",
            Self::StatusEffectApplied { .. } => "status_effect_applied",
            Self::StatusEffectTicked { .. } => "status_effect_ticked",
            Self::StatusEffectExpired { .. } => "status_effect_expired",
            Self::StunSkipped { .. } => "stun_skipped",
            Self::ScanCompleted { .. } => "scan_completed",
            Self::RetreatFailed => "retreat_failed",
            Self::BattleWon => "battle_won",
            Self::BattleLost => "battle_lost",
            Self::BattleRetreated => "battle_retreated",
        }
    }
}
