//! Pure combat math: element table, damage formulas, defense resolution and
//! the random source every roll goes through.
//!
//! Nothing here touches battle state; the engine feeds in effective stats
//! and applies the results.
pub mod damage;
pub mod defense;
pub mod element;
pub mod rng;

pub use damage::{
    CriticalRoll, estimate_basic, estimate_skill, item_damage, lifesteal_amount, raw_damage,
    roll_critical, skill_damage,
};
pub use defense::{BlockResult, DefenseResolution, dodge_chance, resolve_defense};
pub use element::{element_multiplier, is_strong_against, is_weak_against, resistant_element};
pub use rng::{Roller, ScriptedRoller, SeededRoller};
