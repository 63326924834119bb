//! Built-in enemy strategies, one per [`super::AiPattern`].

mod avenger;
mod basic;
mod berserker;
mod bodyguard;
mod commander;
mod coward;
mod debuffer;
mod elemental_shifter;
mod glass_cannon;
mod healer_priest;
mod martyr;
mod mimic;
mod ritualist;
mod saboteur;
mod sniper;
mod swarm_drone;
mod tactician;
mod vampire;

pub use avenger::Avenger;
pub use basic::BasicAi;
pub use berserker::Berserker;
pub use bodyguard::Bodyguard;
pub use commander::Commander;
pub use coward::Coward;
pub use debuffer::Debuffer;
pub use elemental_shifter::ElementalShifter;
pub use glass_cannon::GlassCannon;
pub use healer_priest::HealerPriest;
pub use martyr::Martyr;
pub use mimic::Mimic;
pub use ritualist::Ritualist;
pub use saboteur::Saboteur;
pub use sniper::Sniper;
pub use swarm_drone::SwarmDrone;
pub use tactician::Tactician;
pub use vampire::Vampire;

/// Advances a 1-based rotation counter, wrapping after `len`.
fn advance_rotation(counter: &mut u8, len: u8) -> u8 {
    *counter += 1;
    if *counter > len {
        *counter = 1;
    }
    *counter
}

#[cfg(test)]
pub(crate) mod fixture {
    //! Minimal battlefield for exercising a strategy in isolation.

    use crate::ai::{AiContext, AiEffect, EnemyAi, Intent, PlayerMemory, ReactionContext};
    use crate::combat::Roller;
    use crate::state::{BattleUnit, Roster, StatusBook, UnitId, UnitStats, UnitType};

    pub fn unit(name: &str, hp: u32, attack: i32, defense: i32) -> BattleUnit {
        let mut u = BattleUnit::new(name, UnitType::Knight, UnitStats::new(100, attack, defense));
        u.take_damage(100 - hp);
        u
    }

    pub struct Field {
        pub roster: Roster,
        pub statuses: StatusBook,
        pub memory: PlayerMemory,
    }

    impl Field {
        pub fn new(party: Vec<BattleUnit>, enemies: Vec<BattleUnit>) -> Self {
            Self {
                roster: Roster::new(party, enemies),
                statuses: StatusBook::new(),
                memory: PlayerMemory::default(),
            }
        }

        pub fn decide(
            &self,
            ai: &mut dyn EnemyAi,
            me: UnitId,
            rng: &mut dyn Roller,
        ) -> (Intent, Vec<AiEffect>) {
            let unit = self.roster.get(me).expect("acting unit");
            let mut ctx = AiContext::new(unit, &self.roster, &self.statuses, &self.memory, rng)
                .expect("living opponents");
            let intent = ai.decide_action(&mut ctx);
            (intent, ctx.into_effects())
        }

        pub fn battle_start(&self, ai: &mut dyn EnemyAi, me: UnitId) -> Vec<AiEffect> {
            let unit = self.roster.get(me).expect("reacting unit");
            let mut ctx = ReactionContext::new(unit, &self.roster, &self.statuses);
            ai.on_battle_start(&mut ctx);
            ctx.into_effects()
        }

        pub fn unit_died(
            &self,
            ai: &mut dyn EnemyAi,
            me: UnitId,
            dead: UnitId,
            killer: UnitId,
        ) -> Vec<AiEffect> {
            let unit = self.roster.get(me).expect("reacting unit");
            let mut ctx = ReactionContext::new(unit, &self.roster, &self.statuses);
            ai.on_unit_died(&mut ctx, dead, killer);
            ctx.into_effects()
        }
    }
}
