//! Read-only battle view handed to AI strategies, plus the effect queue they
//! use to request state changes.

use super::targeting;
use crate::catalog::SkillDefinition;
use crate::combat::Roller;
use crate::state::{
    BattleUnit, ElementType, Roster, Side, StatusBook, StatusEffectType, StatusEffects, UnitId,
};

/// What the party did most recently, observed by copying and adapting AIs.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerMemory {
    pub last_skill: Option<SkillDefinition>,
    pub last_attack_element: ElementType,
}

/// A state change requested by a strategy.
///
/// Strategies never mutate battle state directly. The engine applies queued
/// effects right after the strategy returns, before the next enemy decides.
#[derive(Clone, Debug, PartialEq)]
pub enum AiEffect {
    ApplyStatus {
        unit: UnitId,
        kind: StatusEffectType,
        duration: u32,
        value: f32,
    },
    CureStatus {
        unit: UnitId,
        kind: StatusEffectType,
    },
    Heal {
        unit: UnitId,
        amount: u32,
    },
    RaiseAttack {
        unit: UnitId,
        amount: i32,
    },
    SetElement {
        unit: UnitId,
        element: ElementType,
    },
    /// Leave the battle without dying.
    Flee {
        unit: UnitId,
    },
}

/// Shared parts of every AI-facing view.
struct View<'a> {
    me: &'a BattleUnit,
    roster: &'a Roster,
    statuses: &'a StatusBook,
    effects: Vec<AiEffect>,
}

impl<'a> View<'a> {
    fn allies(&self) -> Vec<&'a BattleUnit> {
        self.roster.side(self.me.side).iter().collect()
    }
}

/// Context for [`super::EnemyAi::decide_action`].
///
/// Guarantees at least one living opponent.
pub struct AiContext<'a> {
    view: View<'a>,
    players: Vec<&'a BattleUnit>,
    first_player: &'a BattleUnit,
    memory: &'a PlayerMemory,
    rng: &'a mut dyn Roller,
}

impl<'a> AiContext<'a> {
    /// Returns `None` when the acting unit has no living opponents.
    pub fn new(
        me: &'a BattleUnit,
        roster: &'a Roster,
        statuses: &'a StatusBook,
        memory: &'a PlayerMemory,
        rng: &'a mut dyn Roller,
    ) -> Option<Self> {
        let players: Vec<&'a BattleUnit> = roster.living(me.side.opposing()).collect();
        let first_player = *players.first()?;
        Some(Self {
            view: View {
                me,
                roster,
                statuses,
                effects: Vec::new(),
            },
            players,
            first_player,
            memory,
            rng,
        })
    }

    /// The deciding unit.
    pub fn me(&self) -> &'a BattleUnit {
        self.view.me
    }

    /// Living opponents in roster order. Never empty.
    pub fn living_players(&self) -> &[&'a BattleUnit] {
        &self.players
    }

    /// First living opponent, the universal fallback target.
    pub fn first_player(&self) -> &'a BattleUnit {
        self.first_player
    }

    /// Every unit on the deciding unit's side, dead ones included.
    pub fn allies(&self) -> Vec<&'a BattleUnit> {
        self.view.allies()
    }

    pub fn status_effects(&self, unit: UnitId) -> Option<&'a StatusEffects> {
        self.view.statuses.effects(unit)
    }

    pub fn is_stunned(&self, unit: UnitId) -> bool {
        self.view.statuses.is_stunned(unit)
    }

    pub fn memory(&self) -> &'a PlayerMemory {
        self.memory
    }

    pub fn rng(&mut self) -> &mut dyn Roller {
        &mut *self.rng
    }

    /// Aggro-weighted opponent for an attack of `element`.
    pub fn weighted_target(&mut self, element: ElementType) -> &'a BattleUnit {
        targeting::pick_weighted_target(&self.players, element, &mut *self.rng)
            .unwrap_or(self.first_player)
    }

    /// Random living ally (self included).
    pub fn random_living_ally(&mut self) -> Option<&'a BattleUnit> {
        let allies = self.view.allies();
        targeting::random_living(&allies, &mut *self.rng)
    }

    pub fn push(&mut self, effect: AiEffect) {
        self.view.effects.push(effect);
    }

    pub fn apply_status(&mut self, unit: UnitId, kind: StatusEffectType, duration: u32, value: f32) {
        self.push(AiEffect::ApplyStatus {
            unit,
            kind,
            duration,
            value,
        });
    }

    pub fn into_effects(self) -> Vec<AiEffect> {
        self.view.effects
    }
}

/// Context for battle-start and death hooks. Opponents may all be dead.
pub struct ReactionContext<'a> {
    view: View<'a>,
}

impl<'a> ReactionContext<'a> {
    pub fn new(me: &'a BattleUnit, roster: &'a Roster, statuses: &'a StatusBook) -> Self {
        Self {
            view: View {
                me,
                roster,
                statuses,
                effects: Vec::new(),
            },
        }
    }

    pub fn me(&self) -> &'a BattleUnit {
        self.view.me
    }

    /// Every unit on the reacting unit's side, dead ones included.
    pub fn allies(&self) -> Vec<&'a BattleUnit> {
        self.view.allies()
    }

    pub fn living_allies(&self) -> Vec<&'a BattleUnit> {
        self.view.roster.living(self.view.me.side).collect()
    }

    pub fn is_ally(&self, unit: UnitId) -> bool {
        self.view.roster.side_of(unit) == Some(self.view.me.side)
    }

    pub fn side(&self) -> Side {
        self.view.me.side
    }

    pub fn has_status(&self, unit: UnitId, kind: StatusEffectType) -> bool {
        self.view.statuses.has(unit, kind)
    }

    pub fn push(&mut self, effect: AiEffect) {
        self.view.effects.push(effect);
    }

    pub fn apply_status(&mut self, unit: UnitId, kind: StatusEffectType, duration: u32, value: f32) {
        self.push(AiEffect::ApplyStatus {
            unit,
            kind,
            duration,
            value,
        });
    }

    pub fn cure_status(&mut self, unit: UnitId, kind: StatusEffectType) {
        self.push(AiEffect::CureStatus { unit, kind });
    }

    pub fn into_effects(self) -> Vec<AiEffect> {
        self.view.effects
    }
}

/// Read-only view used to ask strategies about attack redirection.
pub struct RedirectView<'a> {
    pub me: &'a BattleUnit,
    pub roster: &'a Roster,
}
