use std::collections::HashMap;

use tracing::debug;

use super::{BattleEngine, Stage};
use crate::ai::{AiPattern, EnemyAi, PlayerMemory};
use crate::bestiary::Bestiary;
use crate::catalog::Catalog;
use crate::combat::{Roller, SeededRoller};
use crate::config::BattleConfig;
use crate::error::SetupError;
use crate::retreat::RetreatPolicy;
use crate::state::{BattleState, BattleUnit, Inventory, Roster, StatusBook};

/// How an enemy gets its strategy.
enum AiBinding {
    Strategy(Box<dyn EnemyAi>),
    /// Built at `build` time from the catalog's skill set for the unit type.
    Pattern(AiPattern),
}

/// Assembles a [`BattleEngine`].
///
/// Enemies and their strategies are bound positionally: the n-th binding
/// drives the n-th enemy. Without an explicit roller the engine rolls from a
/// [`SeededRoller`], seeded from entropy unless [`seed`](Self::seed) is set.
#[derive(Default)]
pub struct BattleEngineBuilder {
    party: Vec<BattleUnit>,
    enemies: Vec<BattleUnit>,
    bindings: Vec<AiBinding>,
    catalog: Catalog,
    config: BattleConfig,
    retreat: Option<RetreatPolicy>,
    bestiary: Option<Bestiary>,
    seed: Option<u64>,
    roller: Option<Box<dyn Roller>>,
}

impl BattleEngineBuilder {
    pub fn party(mut self, party: impl IntoIterator<Item = BattleUnit>) -> Self {
        self.party.extend(party);
        self
    }

    pub fn party_member(mut self, unit: BattleUnit) -> Self {
        self.party.push(unit);
        self
    }

    /// Adds an enemy driven by `ai`.
    pub fn enemy(mut self, unit: BattleUnit, ai: Box<dyn EnemyAi>) -> Self {
        self.enemies.push(unit);
        self.bindings.push(AiBinding::Strategy(ai));
        self
    }

    /// Adds an enemy driven by a built-in pattern.
    pub fn enemy_with_pattern(mut self, unit: BattleUnit, pattern: AiPattern) -> Self {
        self.enemies.push(unit);
        self.bindings.push(AiBinding::Pattern(pattern));
        self
    }

    /// Adds enemies without strategies. Pair with [`enemy_ais`](Self::enemy_ais).
    pub fn enemies(mut self, enemies: impl IntoIterator<Item = BattleUnit>) -> Self {
        self.enemies.extend(enemies);
        self
    }

    pub fn enemy_ais(mut self, ais: impl IntoIterator<Item = Box<dyn EnemyAi>>) -> Self {
        self.bindings.extend(ais.into_iter().map(AiBinding::Strategy));
        self
    }

    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(mut self, config: BattleConfig) -> Self {
        self.config = config;
        self
    }

    /// Enables fleeing. Battles without a policy reject flee attempts.
    pub fn retreat(mut self, policy: RetreatPolicy) -> Self {
        self.retreat = Some(policy);
        self
    }

    /// Shares an existing bestiary so scans outlive this battle.
    pub fn bestiary(mut self, bestiary: Bestiary) -> Self {
        self.bestiary = Some(bestiary);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Overrides the random source. Takes precedence over [`seed`](Self::seed).
    pub fn roller(mut self, roller: Box<dyn Roller>) -> Self {
        self.roller = Some(roller);
        self
    }

    pub fn build(self) -> Result<BattleEngine, SetupError> {
        if self.party.is_empty() {
            return Err(SetupError::EmptyParty);
        }
        if self.enemies.is_empty() {
            return Err(SetupError::EmptyEnemies);
        }
        if self.enemies.len() != self.bindings.len() {
            return Err(SetupError::AiBindingMismatch {
                units: self.enemies.len(),
                bindings: self.bindings.len(),
            });
        }
        self.config.validate()?;

        let ais: Vec<Box<dyn EnemyAi>> = self
            .enemies
            .iter()
            .zip(self.bindings)
            .map(|(unit, binding)| match binding {
                AiBinding::Strategy(ai) => ai,
                AiBinding::Pattern(pattern) => {
                    pattern.create(self.catalog.enemy_skills(unit.unit_type))
                }
            })
            .collect();

        let rng: Box<dyn Roller> = match (self.roller, self.seed) {
            (Some(roller), _) => roller,
            (None, Some(seed)) => Box::new(SeededRoller::new(seed)),
            (None, None) => Box::new(SeededRoller::from_entropy()),
        };

        debug!(
            target: "battle::engine",
            party = self.party.len(),
            enemies = self.enemies.len(),
            patterns = ?ais.iter().map(|ai| ai.pattern()).collect::<Vec<_>>(),
            "Battle assembled"
        );

        let inventory = Inventory::new(&self.catalog.starting_inventory);
        Ok(BattleEngine {
            state: BattleState::None,
            stage: Stage::Setup,
            turn: 0,
            roster: Roster::new(self.party, self.enemies),
            ais,
            statuses: StatusBook::new(),
            intents: Vec::new(),
            next_intent: 0,
            pending_enemy: None,
            stances: HashMap::new(),
            inventory,
            catalog: self.catalog,
            config: self.config,
            action_points: 0,
            party_cursor: 0,
            active: None,
            input_enabled: false,
            memory: PlayerMemory::default(),
            rng,
            bestiary: self.bestiary.unwrap_or_default(),
            retreat: self.retreat,
            outcome: None,
            events: Vec::new(),
        })
    }
}
