//! Battle worker that owns the authoritative [`BattleEngine`].
//!
//! Runs the driver loop: steps the engine, publishes its events, sleeps for
//! the cosmetic pauses it requests and parks while a party member holds
//! input. Commands from [`crate::BattleHandle`] are served at every suspension
//! point, so an abort lands immediately and actions outside the input window
//! are rejected by the engine's own validation.

use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info};

use battle_core::{
    BattleEngine, BattleOutcome, BattleSnapshot, PlayerAction, PlayerCommand, StatusEffectType,
    Step, UnitId,
};

use crate::api::Result;
use crate::events::{Event, EventBus};
use crate::runtime::TimingConfig;

/// Commands that can be sent to the battle worker
pub enum Command {
    /// Perform an action for the active party member.
    Perform {
        command: PlayerCommand,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Apply a status effect from outside the battle rules (scripted events).
    ApplyStatus {
        unit: UnitId,
        kind: StatusEffectType,
        duration: u32,
        value: f32,
        reply: oneshot::Sender<bool>,
    },
    CureStatus {
        unit: UnitId,
        kind: StatusEffectType,
        reply: oneshot::Sender<usize>,
    },
    /// Read-only copy of the battle.
    Snapshot {
        reply: oneshot::Sender<BattleSnapshot>,
    },
    CanPerform {
        action: PlayerAction,
        reply: oneshot::Sender<bool>,
    },
    /// Tear the battle down without a win or loss.
    Abort { reply: oneshot::Sender<()> },
}

/// Background task that drives one battle.
pub struct BattleWorker {
    engine: BattleEngine,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    timing: TimingConfig,
    outcome_tx: Option<oneshot::Sender<BattleOutcome>>,
    seq: u64,
}

impl BattleWorker {
    pub fn new(
        engine: BattleEngine,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
        timing: TimingConfig,
        outcome_tx: oneshot::Sender<BattleOutcome>,
    ) -> Self {
        Self {
            engine,
            command_rx,
            event_bus,
            timing,
            outcome_tx: Some(outcome_tx),
            seq: 0,
        }
    }

    /// Main worker loop.
    ///
    /// Once the battle is over the worker keeps answering queries until every
    /// handle is dropped; actions are rejected from then on.
    pub async fn run(mut self) {
        let outcome = self.drive().await;
        info!(
            target: "runtime::worker",
            %outcome,
            turn = self.engine.turn(),
            "Battle loop finished"
        );

        self.event_bus.publish(Event::Finished { outcome });
        if let Some(tx) = self.outcome_tx.take()
            && tx.send(outcome).is_err()
        {
            debug!(target: "runtime::worker", "Outcome receiver dropped");
        }

        while let Some(cmd) = self.command_rx.recv().await {
            self.handle_command(cmd);
        }
        debug!(target: "runtime::worker", "All handles dropped; worker exiting");
    }

    async fn drive(&mut self) -> BattleOutcome {
        loop {
            let step = self.engine.step();
            self.flush_events();
            match step {
                Step::Continue => {}
                Step::Wait(delay) => {
                    let duration = self.timing.duration(delay);
                    debug!(target: "runtime::worker", ?delay, ?duration, "Pausing");
                    self.pause(duration).await;
                }
                Step::AwaitInput(unit) => {
                    debug!(target: "runtime::worker", %unit, "Waiting for player input");
                    self.await_input().await;
                }
                Step::Finished(outcome) => return outcome,
            }
        }
    }

    /// Sleeps for `duration` while still serving commands.
    ///
    /// Returns early if a command ends the battle.
    async fn pause(&mut self, duration: Duration) {
        let sleep = tokio::time::sleep(duration);
        tokio::pin!(sleep);

        loop {
            tokio::select! {
                _ = &mut sleep => return,
                cmd = self.command_rx.recv() => {
                    match cmd {
                        Some(cmd) => self.handle_command(cmd),
                        None => self.abandon(),
                    }
                    if self.engine.outcome().is_some() {
                        return;
                    }
                }
            }
        }
    }

    /// Parks until the active member's input closes or the battle ends.
    async fn await_input(&mut self) {
        while self.engine.is_input_enabled() && self.engine.outcome().is_none() {
            match self.command_rx.recv().await {
                Some(cmd) => self.handle_command(cmd),
                None => self.abandon(),
            }
        }
    }

    /// Every handle is gone, so nobody can finish the battle.
    fn abandon(&mut self) {
        debug!(target: "runtime::worker", "Command channel closed; aborting battle");
        self.engine.abort();
        self.flush_events();
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Perform { command, reply } => {
                let result = self.engine.perform(command).map_err(Into::into);
                self.flush_events();
                if reply.send(result).is_err() {
                    debug!(target: "runtime::worker", "Perform reply channel closed (caller dropped)");
                }
            }
            Command::ApplyStatus {
                unit,
                kind,
                duration,
                value,
                reply,
            } => {
                let applied = self.engine.outcome().is_none()
                    && self.engine.apply_status_effect(unit, kind, duration, value);
                self.flush_events();
                let _ = reply.send(applied);
            }
            Command::CureStatus { unit, kind, reply } => {
                let cured = self.engine.cure_status_effect(unit, kind);
                self.flush_events();
                let _ = reply.send(cured);
            }
            Command::Snapshot { reply } => {
                if reply.send(self.engine.snapshot()).is_err() {
                    debug!(target: "runtime::worker", "Snapshot reply channel closed (caller dropped)");
                }
            }
            Command::CanPerform { action, reply } => {
                let _ = reply.send(self.engine.can_perform(action));
            }
            Command::Abort { reply } => {
                info!(target: "runtime::worker", "Abort requested");
                self.engine.abort();
                self.flush_events();
                let _ = reply.send(());
            }
        }
    }

    fn flush_events(&mut self) {
        let turn = self.engine.turn();
        for event in self.engine.drain_events() {
            self.event_bus.publish(Event::Battle {
                seq: self.seq,
                turn,
                event,
            });
            self.seq += 1;
        }
    }
}
