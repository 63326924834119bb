//! Async orchestration for battles.
//!
//! This crate drives a [`battle_core::BattleEngine`] from a single tokio task,
//! inserting the cosmetic pauses the engine asks for and parking while a
//! party member holds input. Consumers embed [`BattleRuntime`] to start a
//! battle, issue commands through [`BattleHandle`], and subscribe to events.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the orchestrator, builder and timing configuration
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides the topic-based event bus
//! - `workers` keeps the battle driver loop internal to the crate
pub mod api;
pub mod events;
pub mod runtime;

mod workers;

pub use api::{AutoPartyPolicy, BattleHandle, PartyPolicy, Result, RuntimeError};
pub use events::{Event, EventBus, Topic};
pub use runtime::{BattleRuntime, BattleRuntimeBuilder, RuntimeConfig, TimingConfig};
