//! Battle state types: units, roster, status effects and inventory.
mod inventory;
mod roster;
mod status;
mod types;
mod unit;

pub use inventory::{Inventory, InventorySlot};
pub use roster::Roster;
pub use status::{StatusBook, StatusEffect, StatusEffects, TickReport};
pub use types::{
    BattleOutcome, BattleState, DefensiveStance, ElementType, PlayerAction, Side,
    SkillTargetType, StatusEffectType, UnitId, UnitType,
};
pub use unit::{BattleUnit, DefensiveGear, UnitStats};
