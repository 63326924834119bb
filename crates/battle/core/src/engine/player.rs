//! Player command handling.
//!
//! Every command is validated in full before any state changes, so a rejected
//! command leaves the battle exactly as it was.

use tracing::debug;

use super::BattleEngine;
use crate::catalog::ItemDefinition;
use crate::combat::{raw_damage, roll_critical};
use crate::error::InputError;
use crate::event::BattleEvent;
use crate::retreat::RetreatResult;
use crate::state::{
    BattleOutcome, BattleState, BattleUnit, DefensiveStance, PlayerAction, Side,
    SkillTargetType, UnitId,
};

/// A command issued for the active party member.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PlayerCommand {
    Attack { target: UnitId },
    /// Index into the member's skill list.
    Skill {
        index: usize,
        target: Option<UnitId>,
    },
    /// Index into the shared inventory.
    Item {
        index: usize,
        target: Option<UnitId>,
    },
    Scan { target: UnitId },
    Block,
    Dodge,
    Flee,
}

impl PlayerCommand {
    pub const fn action(&self) -> PlayerAction {
        match self {
            Self::Attack { .. } => PlayerAction::Attack,
            Self::Skill { .. } => PlayerAction::Skill,
            Self::Item { .. } => PlayerAction::Item,
            Self::Scan { .. } => PlayerAction::Scan,
            Self::Block => PlayerAction::Block,
            Self::Dodge => PlayerAction::Dodge,
            Self::Flee => PlayerAction::Flee,
        }
    }

    const fn target(&self) -> Option<UnitId> {
        match self {
            Self::Attack { target } | Self::Scan { target } => Some(*target),
            Self::Skill { target, .. } | Self::Item { target, .. } => *target,
            Self::Block | Self::Dodge | Self::Flee => None,
        }
    }
}

impl BattleEngine {
    /// Performs a command for the active party member.
    ///
    /// The battle-end check runs after every accepted command; if it decides
    /// the battle, input closes immediately.
    pub fn perform(&mut self, command: PlayerCommand) -> Result<(), InputError> {
        let result = self.try_perform(command);
        if let Err(err) = &result {
            debug!(
                target: "battle::engine",
                action = %command.action(),
                target_unit = ?command.target(),
                error = %err,
                "Rejected player command"
            );
            return result;
        }
        if self.outcome.is_none() {
            self.check_battle_end();
        }
        result
    }

    fn try_perform(&mut self, command: PlayerCommand) -> Result<(), InputError> {
        // a stance closes input, so a second stance is reported before that
        if matches!(command, PlayerCommand::Block | PlayerCommand::Dodge)
            && self.state == BattleState::PlayerTurn
            && let Some(actor) = self.active
            && self.stance_of(actor) != DefensiveStance::None
        {
            return Err(InputError::StanceAlreadySet);
        }
        let actor = self.validate_input()?;
        match command {
            PlayerCommand::Attack { target } => self.perform_attack(actor, target),
            PlayerCommand::Skill { index, target } => self.perform_skill(actor, index, target),
            PlayerCommand::Item { index, target } => self.perform_item(actor, index, target),
            PlayerCommand::Scan { target } => self.perform_scan(actor, target),
            PlayerCommand::Block => self.perform_stance(actor, DefensiveStance::Blocking),
            PlayerCommand::Dodge => self.perform_stance(actor, DefensiveStance::Dodging),
            PlayerCommand::Flee => self.perform_flee(actor),
        }
    }

    fn validate_input(&self) -> Result<UnitId, InputError> {
        let not_accepting = InputError::NotAcceptingInput { state: self.state };
        if !self.accepting_input() {
            return Err(not_accepting);
        }
        let actor = self.active.ok_or(not_accepting)?;
        if self.action_points < 1 {
            return Err(InputError::InsufficientActionPoints {
                required: 1,
                available: self.action_points,
            });
        }
        Ok(actor)
    }

    fn perform_attack(&mut self, actor: UnitId, target: UnitId) -> Result<(), InputError> {
        self.living_on(target, Side::Enemy)?;
        self.select(actor, PlayerAction::Attack, Some(target));

        let target = self.redirect_target(actor, target);
        let (Some(attacker), Some(defender)) = (self.roster.get(actor), self.roster.get(target))
        else {
            return Ok(());
        };
        self.memory.last_attack_element = attacker.element;

        let raw = raw_damage(
            self.statuses.effective_attack(attacker),
            self.statuses.effective_defense(defender),
            attacker.element,
            defender.element,
            &self.config,
        );
        let crit = roll_critical(raw, attacker.crit_chance, &self.config, &mut *self.rng);
        if crit.critical {
            self.emit(BattleEvent::CriticalHit {
                attacker: actor,
                target,
            });
        }
        self.emit(BattleEvent::AttackExecuted {
            attacker: actor,
            target,
            raw_damage: crit.damage,
        });
        self.deal_damage(target, actor, crit.damage);

        self.set_action_points(0);
        self.end_player_input();
        Ok(())
    }

    fn perform_skill(
        &mut self,
        actor: UnitId,
        index: usize,
        target: Option<UnitId>,
    ) -> Result<(), InputError> {
        let Some(caster) = self.roster.get(actor) else {
            return Err(InputError::InvalidTarget { target: Some(actor) });
        };
        let skill = self
            .catalog
            .player_skills(caster.unit_type)
            .get(index)
            .cloned()
            .ok_or(InputError::InvalidSkillIndex { index })?;
        if !caster.can_afford(skill.cost) {
            return Err(InputError::InsufficientResource {
                cost: skill.cost,
                available: caster.resource,
            });
        }

        let resolved = match skill.target {
            SkillTargetType::SelfTarget => Some(actor),
            SkillTargetType::Ally => Some(self.ally_or_lowest_hp(target)?),
            SkillTargetType::Enemy if skill.area => match target {
                Some(t) => Some(self.living_on(t, Side::Enemy)?),
                None => None,
            },
            SkillTargetType::Enemy => {
                let t = target.ok_or(InputError::InvalidTarget { target: None })?;
                Some(self.living_on(t, Side::Enemy)?)
            }
        };

        self.memory.last_skill = Some(skill.clone());
        // every skill counts, support and non-elemental ones included
        self.memory.last_attack_element = skill.element;

        self.select(actor, PlayerAction::Skill, resolved);
        let resolved = match resolved {
            Some(t) if skill.target == SkillTargetType::Enemy && !skill.area => {
                Some(self.redirect_target(actor, t))
            }
            other => other,
        };

        if let Some(caster) = self.roster.get_mut(actor) {
            caster.spend_resource(skill.cost);
        }
        debug!(
            target: "battle::engine",
            caster = %actor,
            skill = %skill.name,
            cost = skill.cost,
            "Skill used"
        );
        self.execute_skill(&skill, actor, resolved, false);
        self.consume_action_point();
        Ok(())
    }

    fn perform_item(
        &mut self,
        actor: UnitId,
        index: usize,
        target: Option<UnitId>,
    ) -> Result<(), InputError> {
        let slot = self
            .inventory
            .slot(index)
            .ok_or(InputError::InvalidItemIndex { index })?;
        if slot.quantity == 0 {
            return Err(InputError::ItemOutOfStock { index });
        }
        let item = slot.item.clone();

        if item.escape {
            if self.retreat.is_none() {
                return Err(InputError::RetreatUnavailable);
            }
            self.select(actor, PlayerAction::Item, None);
            self.inventory.take(index);
            self.attempt_retreat(true);
            return Ok(());
        }

        let resolved = self.resolve_item_target(&item, actor, target)?;
        self.select(actor, PlayerAction::Item, Some(resolved));
        self.inventory.take(index);
        debug!(
            target: "battle::engine",
            user = %actor,
            item = %item.name,
            target_unit = %resolved,
            "Item used"
        );
        self.apply_item(&item, actor, resolved);
        self.consume_action_point();
        Ok(())
    }

    fn resolve_item_target(
        &self,
        item: &ItemDefinition,
        actor: UnitId,
        target: Option<UnitId>,
    ) -> Result<UnitId, InputError> {
        if item.revive {
            let dead = match target {
                Some(t) => self
                    .roster
                    .get(t)
                    .filter(|u| u.side == Side::Party && !u.is_alive()),
                None => self.roster.party().iter().find(|u| !u.is_alive()),
            };
            return dead
                .map(|u| u.id)
                .ok_or(InputError::InvalidTarget { target });
        }

        match item.target {
            SkillTargetType::SelfTarget => Ok(actor),
            SkillTargetType::Ally => self.ally_or_lowest_hp(target),
            SkillTargetType::Enemy => {
                let t = target.ok_or(InputError::InvalidTarget { target: None })?;
                self.living_on(t, Side::Enemy)
            }
        }
    }

    /// Applies a consumed item. Revival excludes every other effect.
    fn apply_item(&mut self, item: &ItemDefinition, user: UnitId, target: UnitId) {
        if item.revive {
            if let Some(unit) = self.roster.get_mut(target) {
                if !unit.is_alive() {
                    unit.revive(item.heal_hp);
                    let hp = unit.hp;
                    self.emit(BattleEvent::UnitRevived { unit: target, hp });
                }
            }
            return;
        }

        if !self.roster.is_alive(target) {
            return;
        }
        self.cure_status_effect(target, item.cures);
        if item.heal_hp > 0 {
            self.heal_unit(target, item.heal_hp);
        }
        if item.restore_resource > 0 {
            let restored = self
                .roster
                .get_mut(target)
                .filter(|u| u.max_resource > 0)
                .map_or(0, |u| u.restore_resource(item.restore_resource));
            if restored > 0 {
                self.emit(BattleEvent::ResourceRestored {
                    unit: target,
                    amount: restored,
                });
            }
        }
        if item.damage > 0 {
            self.item_strike(item, user, target);
        }
    }

    fn perform_scan(&mut self, actor: UnitId, target: UnitId) -> Result<(), InputError> {
        let target = self.living_on(target, Side::Enemy)?;
        if let Some(unit) = self.roster.get(target) {
            self.bestiary.record_scan(unit);
        }
        self.select(actor, PlayerAction::Scan, Some(target));
        self.emit(BattleEvent::ScanCompleted {
            scanner: actor,
            target,
        });
        self.consume_action_point();
        Ok(())
    }

    fn perform_stance(&mut self, actor: UnitId, stance: DefensiveStance) -> Result<(), InputError> {
        let action = match stance {
            DefensiveStance::Dodging => PlayerAction::Dodge,
            _ => PlayerAction::Block,
        };
        self.select(actor, action, None);
        self.stances.insert(actor, stance);
        self.emit(BattleEvent::DefensiveStanceChanged {
            unit: actor,
            stance,
        });
        self.set_action_points(0);
        self.end_player_input();
        Ok(())
    }

    fn perform_flee(&mut self, actor: UnitId) -> Result<(), InputError> {
        let policy = self.retreat.ok_or(InputError::RetreatUnavailable)?;
        if !policy.can_retreat() {
            return Err(InputError::RetreatBlocked);
        }
        self.select(actor, PlayerAction::Flee, None);
        if !self.attempt_retreat(false) {
            self.set_action_points(0);
            self.end_player_input();
        }
        Ok(())
    }

    /// Rolls a retreat and aborts the battle on success.
    fn attempt_retreat(&mut self, guaranteed: bool) -> bool {
        let Some(policy) = self.retreat else {
            return false;
        };
        match policy.try_retreat(guaranteed, &mut *self.rng) {
            RetreatResult::Escaped => {
                self.abort_with(BattleOutcome::Retreated);
                true
            }
            RetreatResult::Failed => {
                self.emit(BattleEvent::RetreatFailed);
                false
            }
        }
    }

    fn select(&mut self, unit: UnitId, action: PlayerAction, target: Option<UnitId>) {
        self.emit(BattleEvent::PlayerActionSelected {
            unit,
            action,
            target,
        });
    }

    /// Checks that `target` is a living unit on `side`.
    fn living_on(&self, target: UnitId, side: Side) -> Result<UnitId, InputError> {
        self.roster
            .get(target)
            .filter(|u| u.side == side && u.is_alive())
            .map(|u| u.id)
            .ok_or(InputError::InvalidTarget {
                target: Some(target),
            })
    }

    /// The requested ally if alive, otherwise the living ally with the least HP.
    fn ally_or_lowest_hp(&self, target: Option<UnitId>) -> Result<UnitId, InputError> {
        if let Some(t) = target {
            if self.living_on(t, Side::Party).is_ok() {
                return Ok(t);
            }
        }
        self.roster
            .living(Side::Party)
            .fold(None, |lowest: Option<&BattleUnit>, u| match lowest {
                Some(l) if l.hp <= u.hp => Some(l),
                _ => Some(u),
            })
            .map(|u| u.id)
            .ok_or(InputError::InvalidTarget { target })
    }

    fn consume_action_point(&mut self) {
        self.set_action_points(self.action_points.saturating_sub(1));
        if self.action_points == 0 {
            self.end_player_input();
        }
    }

    fn set_action_points(&mut self, remaining: u8) {
        if self.action_points != remaining {
            self.action_points = remaining;
            self.emit(BattleEvent::ActionPointsChanged { remaining });
        }
    }
}
