//! High-level battle orchestrator.
//!
//! The runtime owns the battle worker, wires up command/event channels, and
//! exposes a builder-based API for clients to start and await a battle.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use battle_content::builtin;
use battle_core::{
    AiPattern, BattleConfig, BattleEngine, BattleOutcome, BattleUnit, Bestiary, Catalog, Delay,
    EnemyAi, RetreatPolicy, Roller,
};

use crate::api::providers::drive_party;
use crate::api::{BattleHandle, PartyPolicy, Result, RuntimeError};
use crate::events::{Event, EventBus, Topic};
use crate::workers::{BattleWorker, Command};

/// Cosmetic pauses between battle steps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimingConfig {
    pub battle_start: Duration,
    pub intent_display: Duration,
    pub pre_enemy_attack: Duration,
    pub between_enemy_attacks: Duration,
    pub post_action: Duration,
    pub battle_end: Duration,
}

impl TimingConfig {
    pub const DEFAULT_BATTLE_START: Duration = Duration::from_millis(1000);
    pub const DEFAULT_INTENT_DISPLAY: Duration = Duration::from_millis(2500);
    pub const DEFAULT_PRE_ENEMY_ATTACK: Duration = Duration::from_millis(600);
    pub const DEFAULT_BETWEEN_ENEMY_ATTACKS: Duration = Duration::from_millis(800);
    pub const DEFAULT_POST_ACTION: Duration = Duration::from_millis(300);
    pub const DEFAULT_BATTLE_END: Duration = Duration::from_millis(1500);

    /// No pauses at all. Used by tests and headless simulation.
    pub fn instant() -> Self {
        Self {
            battle_start: Duration::ZERO,
            intent_display: Duration::ZERO,
            pre_enemy_attack: Duration::ZERO,
            between_enemy_attacks: Duration::ZERO,
            post_action: Duration::ZERO,
            battle_end: Duration::ZERO,
        }
    }

    pub fn duration(&self, delay: Delay) -> Duration {
        match delay {
            Delay::BattleStart => self.battle_start,
            Delay::IntentDisplay => self.intent_display,
            Delay::PreEnemyAttack => self.pre_enemy_attack,
            Delay::BetweenEnemyAttacks => self.between_enemy_attacks,
            Delay::PostAction => self.post_action,
            Delay::BattleEnd => self.battle_end,
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            battle_start: Self::DEFAULT_BATTLE_START,
            intent_display: Self::DEFAULT_INTENT_DISPLAY,
            pre_enemy_attack: Self::DEFAULT_PRE_ENEMY_ATTACK,
            between_enemy_attacks: Self::DEFAULT_BETWEEN_ENEMY_ATTACKS,
            post_action: Self::DEFAULT_POST_ACTION,
            battle_end: Self::DEFAULT_BATTLE_END,
        }
    }
}

/// Runtime configuration shared across the orchestrator and worker.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub battle_config: BattleConfig,
    pub timing: TimingConfig,
    pub event_buffer_size: usize,
    pub command_buffer_size: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            battle_config: BattleConfig::default(),
            timing: TimingConfig::default(),
            event_buffer_size: 256,
            command_buffer_size: 32,
        }
    }
}

/// A running battle.
///
/// Design: the runtime owns the worker and the optional party policy task.
/// [`BattleHandle`] provides a cloneable façade for clients.
pub struct BattleRuntime {
    handle: BattleHandle,
    outcome_rx: oneshot::Receiver<BattleOutcome>,
    worker_handle: JoinHandle<()>,
    policy_handle: Option<JoinHandle<()>>,
}

impl BattleRuntime {
    /// Create a new runtime builder
    pub fn builder() -> BattleRuntimeBuilder {
        BattleRuntimeBuilder::new()
    }

    /// Get a cloneable handle to this battle
    pub fn handle(&self) -> BattleHandle {
        self.handle.clone()
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.handle.subscribe(topic)
    }

    /// Waits for the battle to end and returns its outcome.
    ///
    /// The worker keeps answering snapshot queries from other handles after
    /// this returns, until the last handle is dropped.
    pub async fn wait(self) -> Result<BattleOutcome> {
        let result = self.outcome_rx.await;
        if let Some(policy) = self.policy_handle {
            policy.abort();
        }
        match result {
            Ok(outcome) => Ok(outcome),
            Err(_) => {
                self.worker_handle.await.map_err(RuntimeError::WorkerJoin)?;
                Err(RuntimeError::OutcomeChannelClosed)
            }
        }
    }

    /// Aborts the battle, then waits for the worker to report.
    pub async fn abort(self) -> Result<BattleOutcome> {
        self.handle.abort().await?;
        self.wait().await
    }
}

enum EnemyBinding {
    Strategy(Box<dyn EnemyAi>),
    Pattern(AiPattern),
}

/// Builder for [`BattleRuntime`] with flexible configuration.
pub struct BattleRuntimeBuilder {
    config: RuntimeConfig,
    party: Vec<BattleUnit>,
    enemies: Vec<(BattleUnit, EnemyBinding)>,
    catalog: Option<Catalog>,
    retreat: Option<RetreatPolicy>,
    bestiary: Option<Bestiary>,
    seed: Option<u64>,
    roller: Option<Box<dyn Roller>>,
    party_policy: Option<Arc<dyn PartyPolicy>>,
    event_bus: Option<EventBus>,
}

impl BattleRuntimeBuilder {
    fn new() -> Self {
        Self {
            config: RuntimeConfig::default(),
            party: Vec::new(),
            enemies: Vec::new(),
            catalog: None,
            retreat: None,
            bestiary: None,
            seed: None,
            roller: None,
            party_policy: None,
            event_bus: None,
        }
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn battle_config(mut self, config: BattleConfig) -> Self {
        self.config.battle_config = config;
        self
    }

    pub fn timing(mut self, timing: TimingConfig) -> Self {
        self.config.timing = timing;
        self
    }

    pub fn party(mut self, party: impl IntoIterator<Item = BattleUnit>) -> Self {
        self.party.extend(party);
        self
    }

    /// Add an enemy driven by an explicit strategy.
    pub fn enemy(mut self, unit: BattleUnit, ai: Box<dyn EnemyAi>) -> Self {
        self.enemies.push((unit, EnemyBinding::Strategy(ai)));
        self
    }

    /// Add an enemy whose strategy is built from `pattern` at build time.
    pub fn enemy_with_pattern(mut self, unit: BattleUnit, pattern: AiPattern) -> Self {
        self.enemies.push((unit, EnemyBinding::Pattern(pattern)));
        self
    }

    /// Skill catalog and starting inventory. Defaults to the built-in content.
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Allow fleeing. Without a policy Flee and escape items are rejected.
    pub fn retreat(mut self, policy: RetreatPolicy) -> Self {
        self.retreat = Some(policy);
        self
    }

    /// Share a bestiary across battles.
    pub fn bestiary(mut self, bestiary: Bestiary) -> Self {
        self.bestiary = Some(bestiary);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Replace the random source entirely. Takes precedence over `seed`.
    pub fn roller(mut self, roller: Box<dyn Roller>) -> Self {
        self.roller = Some(roller);
        self
    }

    /// Let `policy` control the party instead of external callers.
    pub fn party_policy(mut self, policy: impl PartyPolicy + 'static) -> Self {
        self.party_policy = Some(Arc::new(policy));
        self
    }

    /// Publish on an existing bus. Receivers subscribed before `build` see
    /// every event from `BattleStarted` on.
    pub fn event_bus(mut self, bus: EventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Validate the setup and start the battle loop.
    pub async fn build(self) -> Result<BattleRuntime> {
        let catalog = self.catalog.unwrap_or_else(builtin::catalog);

        let mut engine = BattleEngine::builder()
            .party(self.party)
            .catalog(catalog)
            .config(self.config.battle_config);
        for (unit, binding) in self.enemies {
            engine = match binding {
                EnemyBinding::Strategy(ai) => engine.enemy(unit, ai),
                EnemyBinding::Pattern(pattern) => engine.enemy_with_pattern(unit, pattern),
            };
        }
        if let Some(policy) = self.retreat {
            engine = engine.retreat(policy);
        }
        if let Some(bestiary) = self.bestiary {
            engine = engine.bestiary(bestiary);
        }
        if let Some(seed) = self.seed {
            engine = engine.seed(seed);
        }
        if let Some(roller) = self.roller {
            engine = engine.roller(roller);
        }
        let engine = engine.build()?;

        let (command_tx, command_rx) = mpsc::channel::<Command>(self.config.command_buffer_size);
        let (outcome_tx, outcome_rx) = oneshot::channel();
        let event_bus = self
            .event_bus
            .unwrap_or_else(|| EventBus::with_capacity(self.config.event_buffer_size));
        let handle = BattleHandle::new(command_tx, event_bus.clone());

        // subscribe before the worker starts so the first input window is seen
        let policy_input = self
            .party_policy
            .map(|policy| (policy, event_bus.subscribe(Topic::Input)));

        let worker = BattleWorker::new(engine, command_rx, event_bus, self.config.timing, outcome_tx);
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
        });

        let policy_handle = policy_input.map(|(policy, input_rx)| {
            let handle = handle.clone();
            tokio::spawn(async move {
                drive_party(policy, handle, input_rx).await;
            })
        });

        info!(
            target: "runtime::worker",
            automated = policy_handle.is_some(),
            "Battle runtime started"
        );

        Ok(BattleRuntime {
            handle,
            outcome_rx,
            worker_handle,
            policy_handle,
        })
    }
}
