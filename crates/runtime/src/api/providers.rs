//! Asynchronous abstraction for automated party control.
//!
//! Runtime users plug in [`PartyPolicy`] implementations so a battle can run
//! without a human at the controls: scripted fixtures, demo play, or smarter
//! agents. The runtime calls the policy whenever a party member gains input.
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use battle_core::{
    BattleEvent, BattleSnapshot, BattleUnit, Catalog, PlayerCommand, Side, SkillTargetType,
    UnitId,
};

use super::errors::{Result, RuntimeError};
use super::handle::BattleHandle;
use crate::events::Event;

/// Chooses commands for party members.
#[async_trait]
pub trait PartyPolicy: Send + Sync {
    /// Pick the next command for `unit`, the active member in `snapshot`.
    ///
    /// Called once per command until the member's input closes, so a member
    /// with several action points is asked several times.
    async fn choose(&self, unit: UnitId, snapshot: &BattleSnapshot) -> Result<PlayerCommand>;
}

/// Simple heuristic policy used by the demo client.
///
/// In priority order: revive a fallen ally, patch up a badly wounded one,
/// cast the strongest affordable offensive skill, otherwise attack the
/// weakest enemy.
pub struct AutoPartyPolicy {
    catalog: Catalog,
    heal_threshold: f32,
}

impl AutoPartyPolicy {
    pub const DEFAULT_HEAL_THRESHOLD: f32 = 0.35;

    pub fn new(catalog: Catalog) -> Self {
        Self {
            catalog,
            heal_threshold: Self::DEFAULT_HEAL_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_heal_threshold(mut self, threshold: f32) -> Self {
        self.heal_threshold = threshold;
        self
    }

    fn revive(snapshot: &BattleSnapshot) -> Option<PlayerCommand> {
        let fallen = snapshot
            .units
            .iter()
            .find(|u| u.side == Side::Party && !u.is_alive() && !u.has_fled())?;
        let index = snapshot
            .inventory
            .iter()
            .position(|slot| slot.quantity > 0 && slot.item.revive)?;
        Some(PlayerCommand::Item {
            index,
            target: Some(fallen.id),
        })
    }

    fn heal(&self, snapshot: &BattleSnapshot) -> Option<PlayerCommand> {
        let wounded = snapshot
            .units
            .iter()
            .filter(|u| u.side == Side::Party && u.is_alive())
            .filter(|u| u.hp_fraction() < self.heal_threshold)
            .min_by_key(|u| u.hp)?;
        let index = snapshot.inventory.iter().position(|slot| {
            slot.quantity > 0
                && slot.item.heal_hp > 0
                && !slot.item.revive
                && slot.item.target == SkillTargetType::Ally
        })?;
        Some(PlayerCommand::Item {
            index,
            target: Some(wounded.id),
        })
    }

    fn skill(&self, actor: &BattleUnit, target: UnitId) -> Option<PlayerCommand> {
        let (index, skill) = self
            .catalog
            .player_skills(actor.unit_type)
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_offensive() && actor.can_afford(s.cost))
            .max_by(|(_, a), (_, b)| a.damage_multiplier.total_cmp(&b.damage_multiplier))?;
        // a plain attack beats a weak skill
        if skill.damage_multiplier <= 1.0 && skill.status.is_none() {
            return None;
        }
        Some(PlayerCommand::Skill {
            index,
            target: Some(target),
        })
    }
}

#[async_trait]
impl PartyPolicy for AutoPartyPolicy {
    async fn choose(&self, unit: UnitId, snapshot: &BattleSnapshot) -> Result<PlayerCommand> {
        let actor = snapshot
            .units
            .iter()
            .find(|u| u.id == unit)
            .ok_or_else(|| RuntimeError::Policy {
                reason: format!("active unit {unit} is not in the snapshot"),
            })?;
        let weakest = weakest_enemy(snapshot).ok_or_else(|| RuntimeError::Policy {
            reason: "no living enemy to target".into(),
        })?;

        let command = Self::revive(snapshot)
            .or_else(|| self.heal(snapshot))
            .or_else(|| self.skill(actor, weakest))
            .unwrap_or(PlayerCommand::Attack { target: weakest });
        Ok(command)
    }
}

fn weakest_enemy(snapshot: &BattleSnapshot) -> Option<UnitId> {
    snapshot
        .units
        .iter()
        .filter(|u| u.side == Side::Enemy && u.is_alive())
        .min_by_key(|u| u.hp)
        .map(|u| u.id)
}

/// Feeds `policy` commands whenever a party member gains input.
///
/// `input_rx` must be subscribed to [`crate::Topic::Input`] before the
/// battle starts so the first input window is not missed.
pub(crate) async fn drive_party(
    policy: Arc<dyn PartyPolicy>,
    handle: BattleHandle,
    mut input_rx: broadcast::Receiver<Event>,
) {
    loop {
        match input_rx.recv().await {
            Ok(Event::Battle {
                event: BattleEvent::PlayerInputChanged { enabled: true },
                ..
            }) => {
                if let Err(e) = act_while_enabled(policy.as_ref(), &handle).await {
                    warn!(target: "runtime::policy", error = %e, "Party policy stopped");
                    return;
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(target: "runtime::policy", skipped, "Input events lagged");
                if let Err(e) = act_while_enabled(policy.as_ref(), &handle).await {
                    warn!(target: "runtime::policy", error = %e, "Party policy stopped");
                    return;
                }
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

async fn act_while_enabled(policy: &dyn PartyPolicy, handle: &BattleHandle) -> Result<()> {
    loop {
        let snapshot = handle.snapshot().await?;
        if !snapshot.input_enabled || snapshot.outcome.is_some() {
            return Ok(());
        }
        let Some(unit) = snapshot.active_unit else {
            return Ok(());
        };

        let command = policy.choose(unit, &snapshot).await?;
        debug!(target: "runtime::policy", %unit, ?command, "Policy chose command");
        match handle.perform(command).await {
            Ok(()) => {}
            Err(RuntimeError::Input(rejected)) => {
                warn!(
                    target: "runtime::policy",
                    %unit,
                    ?command,
                    error = %rejected,
                    "Policy command rejected; falling back to a basic attack"
                );
                let Some(target) = weakest_enemy(&snapshot) else {
                    return Ok(());
                };
                handle.attack(target).await?;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{BattleState, BattleUnit, InventorySlot, ItemDefinition, UnitStats, UnitType};

    fn unit(id: u16, side: Side, hp: u32) -> BattleUnit {
        let mut unit = BattleUnit::new(format!("U{id}"), UnitType::Knight, UnitStats::new(100, 20, 5));
        unit.id = UnitId(id);
        unit.side = side;
        unit.take_damage(100 - hp);
        unit
    }

    fn snapshot(units: Vec<BattleUnit>, inventory: Vec<InventorySlot>) -> BattleSnapshot {
        BattleSnapshot {
            state: BattleState::PlayerTurn,
            turn: 1,
            units,
            status_effects: Vec::new(),
            intents: Vec::new(),
            inventory,
            active_unit: Some(UnitId(0)),
            action_points: 2,
            input_enabled: true,
            outcome: None,
        }
    }

    fn potion() -> InventorySlot {
        InventorySlot {
            item: ItemDefinition::new("Health Potion", SkillTargetType::Ally).healing(40),
            quantity: 1,
        }
    }

    #[tokio::test]
    async fn attacks_weakest_enemy_by_default() {
        let policy = AutoPartyPolicy::new(Catalog::default());
        let snap = snapshot(
            vec![
                unit(0, Side::Party, 100),
                unit(1, Side::Enemy, 80),
                unit(2, Side::Enemy, 30),
            ],
            Vec::new(),
        );
        let command = policy.choose(UnitId(0), &snap).await.unwrap();
        assert_eq!(command, PlayerCommand::Attack { target: UnitId(2) });
    }

    #[tokio::test]
    async fn heals_wounded_ally_before_attacking() {
        let policy = AutoPartyPolicy::new(Catalog::default());
        let snap = snapshot(
            vec![
                unit(0, Side::Party, 100),
                unit(1, Side::Party, 20),
                unit(2, Side::Enemy, 50),
            ],
            vec![potion()],
        );
        let command = policy.choose(UnitId(0), &snap).await.unwrap();
        assert_eq!(
            command,
            PlayerCommand::Item {
                index: 0,
                target: Some(UnitId(1))
            }
        );
    }

    #[tokio::test]
    async fn missing_enemies_is_a_policy_error() {
        let policy = AutoPartyPolicy::new(Catalog::default());
        let snap = snapshot(vec![unit(0, Side::Party, 100)], Vec::new());
        assert!(matches!(
            policy.choose(UnitId(0), &snap).await,
            Err(RuntimeError::Policy { .. })
        ));
    }
}
