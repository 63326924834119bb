//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;

use battle_core::{BattleEvent, BattleOutcome};

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// State transitions, turn boundaries and enemy intents
    Phase,
    /// Attacks, damage, healing, resources, deaths
    Combat,
    /// Status effect lifecycle and stun skips
    Status,
    /// Player input window, action points, stances, selections
    Input,
    /// Battle results
    Outcome,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::Phase,
        Topic::Combat,
        Topic::Status,
        Topic::Input,
        Topic::Outcome,
    ];

    /// Topic an engine event is routed to.
    pub fn of(event: &BattleEvent) -> Topic {
        use BattleEvent::*;
        match event {
            StateChanged { .. }
            | BattleStarted
            | TurnStarted { .. }
            | TurnEnded { .. }
            | EnemyIntentDeclared { .. }
            | EnemyIntentsCleared
            | EnemyActionStarted { .. }
            | EnemyTurnEnded
            | PlayerTurnStarted { .. }
            | PlayerTurnEnded => Topic::Phase,

            PlayerActionSelected { .. }
            | ActionPointsChanged { .. }
            | PlayerInputChanged { .. }
            | DefensiveStanceChanged { .. } => Topic::Input,

            StatusEffectApplied { .. }
            | StatusEffectTicked { .. }
            | StatusEffectExpired { .. }
            | StunSkipped { .. } => Topic::Status,

            BattleWon | BattleLost | BattleRetreated => Topic::Outcome,

            AttackExecuted { .. }
            | AttackRedirected { .. }
            | DamageTaken { .. }
            | CriticalHit { .. }
            | DodgeSucceeded { .. }
            | DodgeFailed { .. }
            | BlockSucceeded { .. }
            | BlockBypassed { .. }
            | HealApplied { .. }
            | ResourceRestored { .. }
            | ResourceBurned { .. }
            | ItemDestroyed { .. }
            | UnitDied { .. }
            | UnitFled { .. }
            | UnitRevived { .. }
            | ScanCompleted { .. }
            | RetreatFailed => Topic::Combat,
        }
    }
}

/// Event wrapper that carries the engine event and its position in the stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Battle {
        /// Emission order across all topics, starting at 0.
        seq: u64,
        turn: u32,
        event: BattleEvent,
    },

    /// The driver loop has stopped. Published once, after the engine's own
    /// terminal events, including for aborted battles that emit none.
    Finished { outcome: BattleOutcome },
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Battle { event, .. } => Topic::of(event),
            Event::Finished { .. } => Topic::Outcome,
        }
    }

    /// The wrapped engine event, if any.
    pub fn battle_event(&self) -> Option<&BattleEvent> {
        match self {
            Event::Battle { event, .. } => Some(event),
            Event::Finished { .. } => None,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Channels are created up front and never change,
/// so publishing takes no lock.
pub struct EventBus {
    channels: Arc<HashMap<Topic, broadcast::Sender<Event>>>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let channels = Topic::ALL
            .into_iter()
            .map(|topic| (topic, broadcast::channel(capacity).0))
            .collect();

        Self {
            channels: Arc::new(channels),
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if let Some(tx) = self.channels.get(&topic)
            && tx.send(event).is_err()
        {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!(target: "runtime::bus", ?topic, "No subscribers for topic");
        }
    }

    /// Subscribe to a specific topic
    ///
    /// Returns a receiver that will only receive events for that topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        match self.channels.get(&topic) {
            Some(tx) => tx.subscribe(),
            // every topic is created in `with_capacity`
            None => broadcast::channel(1).1,
        }
    }

    /// Subscribe to multiple topics
    ///
    /// Returns receivers for each requested topic.
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            channels: Arc::clone(&self.channels),
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::UnitId;

    fn battle(seq: u64, event: BattleEvent) -> Event {
        Event::Battle { seq, turn: 1, event }
    }

    #[tokio::test]
    async fn events_reach_only_their_topic() {
        let bus = EventBus::new();
        let mut combat = bus.subscribe(Topic::Combat);
        let mut outcome = bus.subscribe(Topic::Outcome);

        bus.publish(battle(0, BattleEvent::CriticalHit {
            attacker: UnitId(0),
            target: UnitId(1),
        }));
        bus.publish(battle(1, BattleEvent::BattleWon));
        bus.publish(Event::Finished {
            outcome: BattleOutcome::Won,
        });

        assert_eq!(combat.recv().await.unwrap().topic(), Topic::Combat);
        assert!(combat.try_recv().is_err());
        assert_eq!(
            outcome.recv().await.unwrap().battle_event(),
            Some(&BattleEvent::BattleWon)
        );
        assert!(matches!(
            outcome.recv().await.unwrap(),
            Event::Finished {
                outcome: BattleOutcome::Won
            }
        ));
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(4);
        bus.publish(battle(0, BattleEvent::BattleStarted));
        let receivers = bus.subscribe_multiple(&Topic::ALL);
        assert_eq!(receivers.len(), 5);
    }
}
