//! Enemy decision layer.
//!
//! Each enemy is bound to one [`EnemyAi`] strategy. Strategies read the battle
//! through an [`AiContext`] and return an [`Intent`]; any other state change
//! they want (buffs, heals, element shifts, fleeing) is queued as an
//! [`AiEffect`] and applied by the engine as soon as the call returns.
//!
//! Shared target-selection helpers live in [`targeting`] and are plain
//! functions over unit slices, so strategies compose them instead of
//! inheriting behavior.

mod context;
mod intent;
mod pattern;
pub mod strategies;
pub mod targeting;

pub use context::{AiContext, AiEffect, PlayerMemory, ReactionContext, RedirectView};
pub use intent::{DeclaredIntent, Intent};
pub use pattern::AiPattern;

use crate::state::UnitId;

/// Decision policy for a single enemy.
pub trait EnemyAi: Send {
    fn pattern(&self) -> AiPattern;

    /// Chooses this turn's intent.
    ///
    /// The returned target should be a living unit from either side. A dead or
    /// unknown target is replaced by the first living opponent.
    fn decide_action(&mut self, ctx: &mut AiContext<'_>) -> Intent;

    /// Called once after the battle starts, in roster order.
    fn on_battle_start(&mut self, _ctx: &mut ReactionContext<'_>) {}

    /// Called for every death in the battle, including this unit's own.
    fn on_unit_died(&mut self, _ctx: &mut ReactionContext<'_>, _dead: UnitId, _killer: UnitId) {}

    /// Offers to take a hit aimed at `target`. Returning a unit id redirects
    /// the attack to that unit.
    fn redirect_attack(
        &self,
        _view: &RedirectView<'_>,
        _attacker: UnitId,
        _target: UnitId,
    ) -> Option<UnitId> {
        None
    }
}
