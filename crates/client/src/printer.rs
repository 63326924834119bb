//! Writes the battle event stream to stdout in emission order.
//!
//! Each topic has its own broadcast channel, so events from different topics
//! can arrive out of order. [`Reorder`] restores the worker's sequence using
//! the `seq` stamped on every event.
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

use anyhow::Result;
use tokio::sync::{broadcast, mpsc};
use tracing::warn;

use battle_core::{BattleEvent, UnitId};
use battle_runtime::{Event, Topic};

use crate::config::OutputFormat;

/// Buffers events until every earlier `seq` has been seen.
#[derive(Debug, Default)]
pub struct Reorder {
    next_seq: u64,
    pending: BTreeMap<u64, Event>,
    finished: Option<Event>,
}

impl Reorder {
    /// Accepts one event and returns the events now ready, in order.
    ///
    /// `Finished` is held back until [`Reorder::finish`].
    pub fn push(&mut self, event: Event) -> Vec<Event> {
        match event {
            Event::Battle { seq, .. } => {
                self.pending.insert(seq, event);
            }
            Event::Finished { .. } => {
                self.finished = Some(event);
                return Vec::new();
            }
        }

        let mut ready = Vec::new();
        while let Some(event) = self.pending.remove(&self.next_seq) {
            ready.push(event);
            self.next_seq += 1;
        }
        ready
    }

    /// Everything still buffered. Gaps left by lagged receivers are skipped.
    pub fn finish(self) -> Vec<Event> {
        if !self.pending.is_empty() {
            warn!(
                expected = self.next_seq,
                buffered = self.pending.len(),
                "Event stream has gaps"
            );
        }
        self.pending.into_values().chain(self.finished).collect()
    }
}

pub struct Printer {
    format: OutputFormat,
    names: HashMap<UnitId, String>,
}

impl Printer {
    pub fn new(format: OutputFormat, names: HashMap<UnitId, String>) -> Self {
        Self { format, names }
    }

    /// Prints until every topic channel closes.
    pub async fn run(self, receivers: HashMap<Topic, broadcast::Receiver<Event>>) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        for (topic, receiver) in receivers {
            tokio::spawn(forward(topic, receiver, tx.clone()));
        }
        drop(tx);

        let mut out = std::io::stdout();
        let mut reorder = Reorder::default();
        while let Some(event) = rx.recv().await {
            for event in reorder.push(event) {
                self.write(&mut out, &event)?;
            }
        }
        for event in reorder.finish() {
            self.write(&mut out, &event)?;
        }
        out.flush()?;
        Ok(())
    }

    fn write(&self, out: &mut impl Write, event: &Event) -> Result<()> {
        match self.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(event)?)?,
            OutputFormat::Text => {
                if let Some(line) = self.describe(event) {
                    writeln!(out, "{line}")?;
                }
            }
        }
        Ok(())
    }

    fn name(&self, id: UnitId) -> &str {
        self.names.get(&id).map_or("?", String::as_str)
    }

    /// Human-readable line for an event. Bookkeeping events print nothing.
    pub fn describe(&self, event: &Event) -> Option<String> {
        let (turn, event) = match event {
            Event::Battle { turn, event, .. } => (*turn, event),
            Event::Finished { outcome } => return Some(format!("== finished: {outcome} ==")),
        };
        use BattleEvent::*;
        let line = match event {
            BattleStarted => "== battle started ==".to_string(),
            TurnStarted { turn } => format!("-- turn {turn} --"),
            EnemyIntentDeclared {
                enemy,
                target,
                estimated_damage,
                skill,
                unblockable,
            } => {
                let what = skill.as_deref().unwrap_or("attack");
                let flag = if *unblockable { " (unblockable)" } else { "" };
                format!(
                    "{} intends {what} on {} for ~{estimated_damage}{flag}",
                    self.name(*enemy),
                    self.name(*target)
                )
            }
            PlayerTurnStarted {
                unit,
                action_points,
            } => format!("{}'s turn ({action_points} AP)", self.name(*unit)),
            PlayerActionSelected {
                unit,
                action,
                target,
            } => match target {
                Some(target) => format!("{} uses {action} on {}", self.name(*unit), self.name(*target)),
                None => format!("{} uses {action}", self.name(*unit)),
            },
            DefensiveStanceChanged { unit, stance } => {
                format!("{} stance: {stance}", self.name(*unit))
            }
            AttackRedirected {
                original,
                redirected_to,
            } => format!(
                "attack on {} redirected to {}",
                self.name(*original),
                self.name(*redirected_to)
            ),
            DamageTaken {
                unit,
                source,
                amount,
            } => format!(
                "{} takes {amount} damage from {}",
                self.name(*unit),
                self.name(*source)
            ),
            CriticalHit { attacker, .. } => format!("{} lands a critical hit", self.name(*attacker)),
            DodgeSucceeded { unit } => format!("{} dodges", self.name(*unit)),
            DodgeFailed { unit } => format!("{} fails to dodge", self.name(*unit)),
            BlockSucceeded { unit, damage } => {
                format!("{} blocks ({damage} gets through)", self.name(*unit))
            }
            BlockBypassed { unit } => format!("{}'s block is bypassed", self.name(*unit)),
            HealApplied { unit, amount } => format!("{} heals {amount}", self.name(*unit)),
            ResourceRestored { unit, amount } => {
                format!("{} restores {amount} resource", self.name(*unit))
            }
            ResourceBurned { unit, amount } => {
                format!("{} loses {amount} resource", self.name(*unit))
            }
            ItemDestroyed { item } => format!("{item} was destroyed"),
            UnitDied { unit, .. } => format!("{} falls", self.name(*unit)),
            UnitFled { unit } => format!("{} flees the battle", self.name(*unit)),
            UnitRevived { unit, hp } => format!("{} is revived with {hp} HP", self.name(*unit)),
            StatusEffectApplied {
                unit,
                effect,
                duration,
            } => format!("{} is afflicted by {effect} for {duration} turns", self.name(*unit)),
            StatusEffectTicked {
                unit,
                effect,
                damage,
            } => format!("{} suffers {damage} from {effect}", self.name(*unit)),
            StatusEffectExpired { unit, effect } => {
                format!("{}'s {effect} wears off", self.name(*unit))
            }
            StunSkipped { unit } => format!("{} is stunned", self.name(*unit)),
            ScanCompleted { scanner, target } => {
                format!("{} scans {}", self.name(*scanner), self.name(*target))
            }
            RetreatFailed => "retreat failed".to_string(),
            BattleWon => "== victory ==".to_string(),
            BattleLost => "== defeat ==".to_string(),
            BattleRetreated => "== the party escaped ==".to_string(),
            StateChanged { .. }
            | TurnEnded { .. }
            | EnemyIntentsCleared
            | EnemyActionStarted { .. }
            | EnemyTurnEnded
            | PlayerTurnEnded
            | ActionPointsChanged { .. }
            | PlayerInputChanged { .. }
            | AttackExecuted { .. } => return None,
        };
        Some(format!("[{turn:>2}] {line}"))
    }
}

async fn forward(
    topic: Topic,
    mut receiver: broadcast::Receiver<Event>,
    tx: mpsc::UnboundedSender<Event>,
) {
    loop {
        match receiver.recv().await {
            Ok(event) => {
                if tx.send(event).is_err() {
                    return;
                }
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(?topic, skipped, "Printer lagged behind the battle");
            }
            Err(broadcast::error::RecvError::Closed) => return,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::BattleOutcome;

    fn battle(seq: u64) -> Event {
        Event::Battle {
            seq,
            turn: 1,
            event: BattleEvent::TurnStarted { turn: 1 },
        }
    }

    fn seqs(events: &[Event]) -> Vec<u64> {
        events
            .iter()
            .filter_map(|e| match e {
                Event::Battle { seq, .. } => Some(*seq),
                Event::Finished { .. } => None,
            })
            .collect()
    }

    #[test]
    fn releases_events_in_sequence() {
        let mut reorder = Reorder::default();
        assert!(reorder.push(battle(1)).is_empty());
        assert!(reorder.push(battle(2)).is_empty());
        assert_eq!(seqs(&reorder.push(battle(0))), vec![0, 1, 2]);
        assert_eq!(seqs(&reorder.push(battle(3))), vec![3]);
    }

    #[test]
    fn finished_comes_last() {
        let mut reorder = Reorder::default();
        reorder.push(Event::Finished {
            outcome: BattleOutcome::Won,
        });
        reorder.push(battle(1));
        let rest = reorder.finish();
        assert_eq!(rest.len(), 2);
        assert!(matches!(rest[1], Event::Finished { .. }));
    }

    #[test]
    fn describes_damage_with_names() {
        let names = HashMap::from([(UnitId(0), "Aldric".to_string()), (UnitId(3), "Goblin".to_string())]);
        let printer = Printer::new(OutputFormat::Text, names);
        let line = printer.describe(&Event::Battle {
            seq: 0,
            turn: 2,
            event: BattleEvent::DamageTaken {
                unit: UnitId(0),
                source: UnitId(3),
                amount: 12,
            },
        });
        assert_eq!(line.as_deref(), Some("[ 2] Aldric takes 12 damage from Goblin"));
    }

    #[test]
    fn bookkeeping_events_are_silent() {
        let printer = Printer::new(OutputFormat::Text, HashMap::new());
        let line = printer.describe(&Event::Battle {
            seq: 0,
            turn: 1,
            event: BattleEvent::PlayerInputChanged { enabled: true },
        });
        assert!(line.is_none());
    }
}
