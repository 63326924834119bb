//! Cloneable façade for issuing commands to the battle worker.
//!
//! [`BattleHandle`] hides channel plumbing and offers async helpers for each
//! player action, queries, and event streams from specific topics.
use tokio::sync::{broadcast, mpsc, oneshot};

use battle_core::{
    BattleSnapshot, PlayerAction, PlayerCommand, StatusEffectType, UnitId,
};

use super::errors::{Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::Command;

/// Client-facing handle to interact with a running battle
#[derive(Clone)]
pub struct BattleHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
}

impl BattleHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>, event_bus: EventBus) -> Self {
        Self {
            command_tx,
            event_bus,
        }
    }

    async fn request<T>(&self, command: impl FnOnce(oneshot::Sender<T>) -> Command) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    /// Perform an action for the active party member.
    ///
    /// Rejected with [`battle_core::InputError::NotAcceptingInput`] unless the
    /// battle is in the player phase with input enabled.
    pub async fn perform(&self, command: PlayerCommand) -> Result<()> {
        self.request(|reply| Command::Perform { command, reply })
            .await?
    }

    pub async fn attack(&self, target: UnitId) -> Result<()> {
        self.perform(PlayerCommand::Attack { target }).await
    }

    /// Use the active member's skill at `index`. Self-targeted skills ignore
    /// `target`; ally skills fall back to the most wounded ally.
    pub async fn use_skill(&self, index: usize, target: Option<UnitId>) -> Result<()> {
        self.perform(PlayerCommand::Skill { index, target }).await
    }

    /// Use the shared inventory item at `index`.
    pub async fn use_item(&self, index: usize, target: Option<UnitId>) -> Result<()> {
        self.perform(PlayerCommand::Item { index, target }).await
    }

    pub async fn block(&self) -> Result<()> {
        self.perform(PlayerCommand::Block).await
    }

    pub async fn dodge(&self) -> Result<()> {
        self.perform(PlayerCommand::Dodge).await
    }

    pub async fn scan(&self, target: UnitId) -> Result<()> {
        self.perform(PlayerCommand::Scan { target }).await
    }

    pub async fn flee(&self) -> Result<()> {
        self.perform(PlayerCommand::Flee).await
    }

    /// Apply a status effect to a living unit. Returns whether it landed.
    pub async fn apply_status_effect(
        &self,
        unit: UnitId,
        kind: StatusEffectType,
        duration: u32,
        value: f32,
    ) -> Result<bool> {
        self.request(|reply| Command::ApplyStatus {
            unit,
            kind,
            duration,
            value,
            reply,
        })
        .await
    }

    /// Remove every effect of `kind` from `unit`. Returns how many were removed.
    pub async fn cure_status_effect(&self, unit: UnitId, kind: StatusEffectType) -> Result<usize> {
        self.request(|reply| Command::CureStatus { unit, kind, reply })
            .await
    }

    /// Query the current battle (read-only snapshot)
    pub async fn snapshot(&self) -> Result<BattleSnapshot> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn can_perform(&self, action: PlayerAction) -> Result<bool> {
        self.request(|reply| Command::CanPerform { action, reply })
            .await
    }

    /// Tear the battle down. No win or loss is reported; the driver loop
    /// stops at its current suspension point.
    pub async fn abort(&self) -> Result<()> {
        self.request(|reply| Command::Abort { reply }).await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Phase` - State transitions, turns and enemy intents
    /// - `Topic::Combat` - Attacks, damage, healing and deaths
    /// - `Topic::Status` - Status effect lifecycle
    /// - `Topic::Input` - Input window, action points and stances
    /// - `Topic::Outcome` - Battle results and the final `Finished` marker
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use battle_runtime::Topic;
    ///
    /// let mut outcome_rx = handle.subscribe(Topic::Outcome);
    /// while let Ok(event) = outcome_rx.recv().await {
    ///     // Handle results
    /// }
    /// ```
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Subscribe to multiple topics at once
    ///
    /// Returns a map of topic to receiver for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> std::collections::HashMap<Topic, broadcast::Receiver<Event>> {
        self.event_bus.subscribe_multiple(topics)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }
}
