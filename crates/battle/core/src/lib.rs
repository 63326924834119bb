//! Deterministic turn-based battle rules.
//!
//! `battle-core` defines the canonical battle state machine, combat math,
//! status effects and the enemy decision layer. It performs no I/O and never
//! sleeps; the runtime crate drives it and fans out its events. All state
//! mutation flows through [`engine::BattleEngine`], and supporting crates
//! depend on the types re-exported here.
pub mod ai;
pub mod bestiary;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod retreat;
pub mod state;
pub use ai::{AiContext, AiEffect, AiPattern, DeclaredIntent, EnemyAi, Intent, ReactionContext};
pub use bestiary::{Bestiary, ScanRecord};
pub use catalog::{Catalog, ItemDefinition, ItemStock, SkillDefinition, StatusRider};
pub use combat::{Roller, ScriptedRoller, SeededRoller};
pub use config::BattleConfig;
pub use engine::{
    BattleEngine, BattleEngineBuilder, BattleSnapshot, Delay, EnemyStep, PlayerCommand, Step,
};
pub use error::{BattleError, ErrorSeverity, InputError, SetupError};
pub use event::BattleEvent;
pub use retreat::{RetreatPolicy, RetreatResult};
pub use state::{
    BattleOutcome, BattleState, BattleUnit, DefensiveGear, DefensiveStance, ElementType,
    Inventory, InventorySlot, PlayerAction, Roster, Side, SkillTargetType, StatusBook,
    StatusEffect, StatusEffectType, StatusEffects, UnitId, UnitStats, UnitType,
};
