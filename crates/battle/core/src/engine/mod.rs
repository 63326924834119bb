//! Battle state machine.
//!
//! The [`BattleEngine`] owns every piece of mutable battle state and is the
//! only thing that mutates it. It is synchronous and never sleeps: each call to
//! [`BattleEngine::step`] performs the next phase step and reports how long the
//! driver should pause (or that it must wait for player input) before calling
//! again. Events produced along the way are queued and drained by the driver.
//!
//! Phase cycle: `BattleStart → [EnemyIntent → PlayerTurn → EnemyTurn →
//! TurnEnd]* → BattleWon | BattleLost`. Won and Lost are absorbing.

mod builder;
mod effects;
mod enemy;
mod player;

pub use builder::BattleEngineBuilder;
pub use enemy::EnemyStep;
pub use player::PlayerCommand;

use std::collections::HashMap;

use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::ai::{DeclaredIntent, EnemyAi, PlayerMemory};
use crate::bestiary::Bestiary;
use crate::catalog::{Catalog, SkillDefinition};
use crate::combat::Roller;
use crate::config::BattleConfig;
use crate::event::BattleEvent;
use crate::retreat::RetreatPolicy;
use crate::state::{
    BattleOutcome, BattleState, BattleUnit, DefensiveStance, Inventory, InventorySlot,
    PlayerAction, Roster, Side, StatusBook, StatusEffect, UnitId,
};

/// Cosmetic pause requested by the engine between steps.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Delay {
    BattleStart,
    IntentDisplay,
    PostAction,
    PreEnemyAttack,
    BetweenEnemyAttacks,
    BattleEnd,
}

/// What the driver should do after a step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// Call `step` again right away.
    Continue,
    /// Pause, then call `step` again.
    Wait(Delay),
    /// A party member holds input; feed it commands until input closes.
    AwaitInput(UnitId),
    /// The battle is over. Further steps are no-ops.
    Finished(BattleOutcome),
}

/// Position of the driver within the turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stage {
    Setup,
    Announce,
    BeginTurn,
    ClearIntents,
    NextMember,
    AwaitingInput,
    AfterMember,
    EndPlayerPhase,
    NextEnemy,
    ExecuteEnemy,
    EndEnemyPhase,
    TurnEnd,
    Ending(BattleOutcome),
    Done,
}

/// Read-only copy of the battle for queries and display.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleSnapshot {
    pub state: BattleState,
    pub turn: u32,
    pub units: Vec<BattleUnit>,
    pub status_effects: Vec<(UnitId, Vec<StatusEffect>)>,
    pub intents: Vec<DeclaredIntent>,
    pub inventory: Vec<InventorySlot>,
    pub active_unit: Option<UnitId>,
    pub action_points: u8,
    pub input_enabled: bool,
    pub outcome: Option<BattleOutcome>,
}

/// Authoritative battle state and rules.
pub struct BattleEngine {
    state: BattleState,
    stage: Stage,
    turn: u32,
    roster: Roster,
    /// One strategy per enemy, in enemy roster order.
    ais: Vec<Box<dyn EnemyAi>>,
    statuses: StatusBook,
    intents: Vec<DeclaredIntent>,
    next_intent: usize,
    pending_enemy: Option<DeclaredIntent>,
    stances: HashMap<UnitId, DefensiveStance>,
    inventory: Inventory,
    catalog: Catalog,
    config: BattleConfig,
    action_points: u8,
    party_cursor: usize,
    active: Option<UnitId>,
    input_enabled: bool,
    memory: PlayerMemory,
    rng: Box<dyn Roller>,
    bestiary: Bestiary,
    retreat: Option<RetreatPolicy>,
    outcome: Option<BattleOutcome>,
    events: Vec<BattleEvent>,
}

impl BattleEngine {
    pub fn builder() -> BattleEngineBuilder {
        BattleEngineBuilder::default()
    }

    /// Runs the next phase step.
    pub fn step(&mut self) -> Step {
        if let Some(outcome) = self.outcome {
            self.stage = Stage::Done;
            return Step::Finished(outcome);
        }

        match self.stage {
            Stage::Setup => {
                self.start();
                self.stage = Stage::Announce;
                Step::Wait(Delay::BattleStart)
            }
            Stage::Announce => {
                self.announce_start();
                self.stage = Stage::BeginTurn;
                Step::Continue
            }
            Stage::BeginTurn => {
                self.begin_turn();
                self.stage = Stage::ClearIntents;
                Step::Wait(Delay::IntentDisplay)
            }
            Stage::ClearIntents => {
                self.clear_intent_display();
                self.begin_player_phase();
                self.stage = Stage::NextMember;
                Step::Continue
            }
            Stage::NextMember => match self.next_party_member() {
                Some(unit) => {
                    self.stage = Stage::AwaitingInput;
                    Step::AwaitInput(unit)
                }
                None => {
                    self.stage = Stage::EndPlayerPhase;
                    Step::Continue
                }
            },
            Stage::AwaitingInput => match self.active {
                Some(unit) if self.input_enabled => Step::AwaitInput(unit),
                _ => {
                    self.stage = Stage::AfterMember;
                    Step::Wait(Delay::PostAction)
                }
            },
            Stage::AfterMember => {
                if let Some(outcome) = self.check_battle_end() {
                    self.stage = Stage::Ending(outcome);
                    return Step::Wait(Delay::BattleEnd);
                }
                self.party_cursor += 1;
                self.stage = Stage::NextMember;
                Step::Continue
            }
            Stage::EndPlayerPhase => {
                self.end_player_phase();
                self.begin_enemy_phase();
                self.stage = Stage::NextEnemy;
                Step::Continue
            }
            Stage::NextEnemy => match self.next_enemy_action() {
                EnemyStep::Skipped => Step::Continue,
                EnemyStep::Stunned(_) | EnemyStep::TargetLost(_) => {
                    Step::Wait(Delay::BetweenEnemyAttacks)
                }
                EnemyStep::Ready { .. } => {
                    self.stage = Stage::ExecuteEnemy;
                    Step::Wait(Delay::PreEnemyAttack)
                }
                EnemyStep::Halted | EnemyStep::Done => {
                    self.stage = Stage::EndEnemyPhase;
                    Step::Continue
                }
            },
            Stage::ExecuteEnemy => {
                self.execute_enemy_action();
                self.stage = Stage::NextEnemy;
                Step::Wait(Delay::BetweenEnemyAttacks)
            }
            Stage::EndEnemyPhase => {
                self.end_enemy_phase();
                if let Some(outcome) = self.check_battle_end() {
                    self.stage = Stage::Ending(outcome);
                    return Step::Wait(Delay::BattleEnd);
                }
                self.stage = Stage::TurnEnd;
                Step::Continue
            }
            Stage::TurnEnd => {
                self.transition(BattleState::TurnEnd);
                self.tick_status_effects();
                if let Some(outcome) = self.check_battle_end() {
                    self.stage = Stage::Ending(outcome);
                    return Step::Wait(Delay::BattleEnd);
                }
                self.finish_turn();
                self.stage = Stage::BeginTurn;
                Step::Wait(Delay::PostAction)
            }
            Stage::Ending(outcome) => {
                self.conclude(outcome);
                self.stage = Stage::Done;
                Step::Finished(outcome)
            }
            // outcome is always set once Done is reached
            Stage::Done => Step::Finished(BattleOutcome::Aborted),
        }
    }

    /// Steps through every pause until input is needed or the battle ends.
    pub fn advance(&mut self) -> Step {
        loop {
            match self.step() {
                Step::Continue | Step::Wait(_) => continue,
                done => return done,
            }
        }
    }

    // ------------------------------------------------------------------
    // Phase steps
    // ------------------------------------------------------------------

    /// Enters `BattleStart`.
    pub fn start(&mut self) {
        info!(
            target: "battle::engine",
            party = self.roster.party().len(),
            enemies = self.roster.enemies().len(),
            "Battle starting"
        );
        self.transition(BattleState::BattleStart);
    }

    /// Announces the battle and runs every strategy's start hook in roster order.
    pub fn announce_start(&mut self) {
        self.emit(BattleEvent::BattleStarted);
        self.run_battle_start_hooks();
    }

    /// Opens a new turn and declares every living enemy's intent.
    pub fn begin_turn(&mut self) {
        self.turn += 1;
        self.emit(BattleEvent::TurnStarted { turn: self.turn });
        self.transition(BattleState::EnemyIntent);
        self.intents.clear();
        self.next_intent = 0;
        self.declare_intents();
    }

    pub fn clear_intent_display(&mut self) {
        self.emit(BattleEvent::EnemyIntentsCleared);
    }

    pub fn begin_player_phase(&mut self) {
        self.transition(BattleState::PlayerTurn);
        self.stances.clear();
        self.party_cursor = 0;
    }

    /// Hands input to the next living, non-stunned party member.
    ///
    /// Stunned members are skipped with a [`BattleEvent::StunSkipped`]. Returns
    /// `None` once every member has had a turn.
    pub fn next_party_member(&mut self) -> Option<UnitId> {
        while let Some(member) = self.roster.party().get(self.party_cursor) {
            let id = member.id;
            if !member.is_alive() {
                self.party_cursor += 1;
                continue;
            }
            if self.statuses.is_stunned(id) {
                self.emit(BattleEvent::StunSkipped { unit: id });
                self.party_cursor += 1;
                continue;
            }

            self.active = Some(id);
            self.action_points = self.config.max_action_points;
            self.input_enabled = true;
            self.emit(BattleEvent::PlayerTurnStarted {
                unit: id,
                action_points: self.action_points,
            });
            self.emit(BattleEvent::ActionPointsChanged {
                remaining: self.action_points,
            });
            self.emit(BattleEvent::PlayerInputChanged { enabled: true });
            return Some(id);
        }
        None
    }

    pub fn end_player_phase(&mut self) {
        self.active = None;
        self.emit(BattleEvent::PlayerTurnEnded);
    }

    pub fn begin_enemy_phase(&mut self) {
        self.transition(BattleState::EnemyTurn);
        self.next_intent = 0;
        self.pending_enemy = None;
    }

    /// Closes the enemy phase; stances only last until here.
    pub fn end_enemy_phase(&mut self) {
        self.pending_enemy = None;
        self.emit(BattleEvent::EnemyTurnEnded);
        self.stances.clear();
    }

    pub fn finish_turn(&mut self) {
        self.emit(BattleEvent::TurnEnded { turn: self.turn });
    }

    /// Returns the outcome if one side has no living units.
    ///
    /// Enemies are checked first, so a mutual wipe counts as a win. Closes
    /// player input when the battle is decided.
    pub fn check_battle_end(&mut self) -> Option<BattleOutcome> {
        let outcome = if !self.roster.any_alive(Side::Enemy) {
            BattleOutcome::Won
        } else if !self.roster.any_alive(Side::Party) {
            BattleOutcome::Lost
        } else {
            return None;
        };
        self.end_player_input();
        Some(outcome)
    }

    /// Enters the terminal state for `outcome` and announces it.
    pub fn conclude(&mut self, outcome: BattleOutcome) {
        if self.outcome.is_some() {
            return;
        }
        match outcome {
            BattleOutcome::Won => {
                self.transition(BattleState::BattleWon);
                self.emit(BattleEvent::BattleWon);
            }
            BattleOutcome::Lost => {
                self.transition(BattleState::BattleLost);
                self.emit(BattleEvent::BattleLost);
            }
            BattleOutcome::Retreated | BattleOutcome::Aborted => {
                self.abort_with(outcome);
                return;
            }
        }
        info!(target: "battle::engine", %outcome, turn = self.turn, "Battle concluded");
        self.outcome = Some(outcome);
    }

    /// Cancels the battle without a win or loss.
    ///
    /// Clears stances, declared intents and status effects, closes input and
    /// returns the state machine to `None`.
    pub fn abort(&mut self) {
        self.abort_with(BattleOutcome::Aborted);
    }

    fn abort_with(&mut self, outcome: BattleOutcome) {
        if self.outcome.is_some() {
            return;
        }
        self.end_player_input();
        self.active = None;
        self.stances.clear();
        self.intents.clear();
        self.pending_enemy = None;
        self.statuses.clear();
        self.transition(BattleState::None);
        if outcome == BattleOutcome::Retreated {
            self.emit(BattleEvent::BattleRetreated);
        }
        info!(target: "battle::engine", %outcome, turn = self.turn, "Battle ended early");
        self.outcome = Some(outcome);
        self.stage = Stage::Done;
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    pub fn state(&self) -> BattleState {
        self.state
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn statuses(&self) -> &StatusBook {
        &self.statuses
    }

    pub fn intents(&self) -> &[DeclaredIntent] {
        &self.intents
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn bestiary(&self) -> &Bestiary {
        &self.bestiary
    }

    pub fn memory(&self) -> &PlayerMemory {
        &self.memory
    }

    pub fn active_unit(&self) -> Option<UnitId> {
        self.active
    }

    pub fn action_points(&self) -> u8 {
        self.action_points
    }

    pub fn is_input_enabled(&self) -> bool {
        self.input_enabled
    }

    pub fn stance_of(&self, unit: UnitId) -> DefensiveStance {
        self.stances.get(&unit).copied().unwrap_or_default()
    }

    /// Skills available to a party member.
    pub fn skills_for(&self, unit: UnitId) -> &[SkillDefinition] {
        match self.roster.get(unit) {
            Some(u) => self.catalog.player_skills(u.unit_type),
            None => &[],
        }
    }

    /// Whether `action` would currently be accepted, ignoring its arguments.
    pub fn can_perform(&self, action: PlayerAction) -> bool {
        if !self.accepting_input() || self.action_points < 1 {
            return false;
        }
        match action {
            PlayerAction::Block | PlayerAction::Dodge => self
                .active
                .is_some_and(|unit| self.stance_of(unit) == DefensiveStance::None),
            PlayerAction::Flee => self.retreat.is_some_and(|policy| policy.can_retreat()),
            _ => true,
        }
    }

    /// AP an action would spend. Turn-ending actions spend everything left.
    pub fn action_point_cost(&self, action: PlayerAction) -> u8 {
        if action.consumes_all_points() {
            self.action_points
        } else {
            1
        }
    }

    pub fn available_actions(&self) -> Vec<PlayerAction> {
        PlayerAction::iter()
            .filter(|action| self.can_perform(*action))
            .collect()
    }

    pub fn has_dead_ally(&self) -> bool {
        self.roster.party().iter().any(|u| !u.is_alive())
    }

    /// Whether the active member has enough resource for skill `index`.
    pub fn can_afford_skill(&self, index: usize) -> bool {
        let Some(unit) = self.active.and_then(|id| self.roster.get(id)) else {
            return false;
        };
        self.catalog
            .player_skills(unit.unit_type)
            .get(index)
            .is_some_and(|skill| unit.can_afford(skill.cost))
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        BattleSnapshot {
            state: self.state,
            turn: self.turn,
            units: self.roster.all().to_vec(),
            status_effects: self
                .statuses
                .units()
                .into_iter()
                .map(|id| {
                    let effects = self
                        .statuses
                        .effects(id)
                        .map(|e| e.iter().copied().collect())
                        .unwrap_or_default();
                    (id, effects)
                })
                .collect(),
            intents: self.intents.clone(),
            inventory: self.inventory.slots().to_vec(),
            active_unit: self.active,
            action_points: self.action_points,
            input_enabled: self.input_enabled,
            outcome: self.outcome,
        }
    }

    /// Takes every event emitted since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    /// The single place battle state changes. Terminal states are absorbing.
    fn transition(&mut self, next: BattleState) {
        if self.state == next || self.state.is_terminal() {
            return;
        }
        let previous = std::mem::replace(&mut self.state, next);
        debug!(target: "battle::engine", %previous, current = %next, "State changed");
        self.emit(BattleEvent::StateChanged {
            previous,
            current: next,
        });
    }

    fn emit(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    fn accepting_input(&self) -> bool {
        self.input_enabled && self.state == BattleState::PlayerTurn && self.outcome.is_none()
    }

    fn end_player_input(&mut self) {
        if self.input_enabled {
            self.input_enabled = false;
            self.emit(BattleEvent::PlayerInputChanged { enabled: false });
        }
    }
}

impl std::fmt::Debug for BattleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleEngine")
            .field("state", &self.state)
            .field("turn", &self.turn)
            .field("active", &self.active)
            .field("action_points", &self.action_points)
            .field("outcome", &self.outcome)
            .finish_non_exhaustive()
    }
}
