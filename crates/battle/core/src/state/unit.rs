//! Combatant state: stats, resource pool, gear and life flags.

use super::types::{ElementType, Side, UnitId, UnitType};

/// Static stats used to configure a unit before it joins a battle.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct UnitStats {
    pub max_hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub crit_chance: f32,
    pub max_resource: u32,
}

impl UnitStats {
    pub const DEFAULT_MAX_HP: u32 = 100;
    pub const DEFAULT_ATTACK: i32 = 20;
    pub const DEFAULT_DEFENSE: i32 = 5;
    pub const DEFAULT_CRIT_CHANCE: f32 = 0.1;

    pub fn new(max_hp: u32, attack: i32, defense: i32) -> Self {
        Self {
            max_hp,
            attack,
            defense,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_crit_chance(mut self, crit_chance: f32) -> Self {
        self.crit_chance = crit_chance;
        self
    }

    #[must_use]
    pub fn with_resource(mut self, max_resource: u32) -> Self {
        self.max_resource = max_resource;
        self
    }
}

impl Default for UnitStats {
    fn default() -> Self {
        Self {
            max_hp: Self::DEFAULT_MAX_HP,
            attack: Self::DEFAULT_ATTACK,
            defense: Self::DEFAULT_DEFENSE,
            crit_chance: Self::DEFAULT_CRIT_CHANCE,
            max_resource: 0,
        }
    }
}

/// Defensive equipment that feeds the dodge/block model.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DefensiveGear {
    /// Added to the base dodge chance before clamping to the configured cap.
    pub dodge_bonus: f32,
    /// Shields raise block chance and turn a successful block into a perfect one.
    pub has_shield: bool,
}

/// A single combatant.
///
/// Invariant: `hp <= max_hp`, and a unit that has not fled is alive exactly
/// when `hp > 0`. A fled unit is out of the fight but was never killed.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleUnit {
    pub id: UnitId,
    pub name: String,
    pub side: Side,
    pub unit_type: UnitType,
    pub element: ElementType,
    pub hp: u32,
    pub max_hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub crit_chance: f32,
    pub resource: u32,
    pub max_resource: u32,
    pub gear: DefensiveGear,
    /// Chance that this unit's basic attacks break through a block.
    pub unblockable_chance: f32,
    /// Display name for Alchemist resources (e.g. a catalyst).
    pub catalyst: Option<String>,
    alive: bool,
    fled: bool,
}

impl BattleUnit {
    pub const DEFAULT_UNBLOCKABLE_CHANCE: f32 = 0.2;

    /// Creates a unit at full health and full resource.
    ///
    /// The id is a placeholder until the unit is placed into a [`super::Roster`].
    pub fn new(name: impl Into<String>, unit_type: UnitType, stats: UnitStats) -> Self {
        Self {
            id: UnitId(0),
            name: name.into(),
            side: Side::Party,
            unit_type,
            element: ElementType::None,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            attack: stats.attack,
            defense: stats.defense,
            crit_chance: stats.crit_chance,
            resource: stats.max_resource,
            max_resource: stats.max_resource,
            gear: DefensiveGear::default(),
            unblockable_chance: Self::DEFAULT_UNBLOCKABLE_CHANCE,
            catalyst: None,
            alive: stats.max_hp > 0,
            fled: false,
        }
    }

    #[must_use]
    pub fn with_element(mut self, element: ElementType) -> Self {
        self.element = element;
        self
    }

    #[must_use]
    pub fn with_gear(mut self, gear: DefensiveGear) -> Self {
        self.gear = gear;
        self
    }

    #[must_use]
    pub fn with_unblockable_chance(mut self, chance: f32) -> Self {
        self.unblockable_chance = chance;
        self
    }

    #[must_use]
    pub fn with_catalyst(mut self, catalyst: impl Into<String>) -> Self {
        self.catalyst = Some(catalyst.into());
        self
    }

    /// Reconfigures stats of a dynamically spawned unit and restores it to full.
    pub fn configure(&mut self, name: impl Into<String>, element: ElementType, stats: &UnitStats) {
        self.name = name.into();
        self.element = element;
        self.max_hp = stats.max_hp;
        self.hp = stats.max_hp;
        self.attack = stats.attack;
        self.defense = stats.defense;
        self.crit_chance = stats.crit_chance;
        self.max_resource = stats.max_resource;
        self.resource = stats.max_resource;
        self.alive = self.hp > 0;
        self.fled = false;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// True when the unit left the battle voluntarily rather than dying.
    #[inline]
    pub fn has_fled(&self) -> bool {
        self.fled
    }

    pub fn hp_fraction(&self) -> f32 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f32 / self.max_hp as f32
    }

    /// Applies damage and returns true if this hit killed the unit.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp = self.hp.saturating_sub(amount);
        if self.hp == 0 {
            self.alive = false;
            return true;
        }
        false
    }

    /// Restores HP up to the maximum. Dead units cannot be healed.
    ///
    /// Returns the amount actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if !self.alive {
            return 0;
        }
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.max_hp);
        self.hp - before
    }

    /// Brings a dead unit back with `hp` clamped to `[1, max_hp]`.
    pub fn revive(&mut self, hp: u32) {
        self.hp = hp.clamp(1, self.max_hp.max(1));
        self.alive = true;
        self.fled = false;
    }

    /// Removes the unit from the fight without killing it.
    pub fn mark_fled(&mut self) {
        self.alive = false;
        self.fled = true;
    }

    pub fn can_afford(&self, cost: u32) -> bool {
        self.resource >= cost
    }

    /// Spends resource if affordable. Returns false without change otherwise.
    pub fn spend_resource(&mut self, cost: u32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.resource -= cost;
        true
    }

    /// Returns the amount actually restored.
    pub fn restore_resource(&mut self, amount: u32) -> u32 {
        let before = self.resource;
        self.resource = self.resource.saturating_add(amount).min(self.max_resource);
        self.resource - before
    }

    /// Drains up to `amount` resource. Returns the amount actually burned.
    pub fn burn_resource(&mut self, amount: u32) -> u32 {
        let burned = amount.min(self.resource);
        self.resource -= burned;
        burned
    }

    /// Label of the resource pool as shown to players.
    pub fn resource_label(&self) -> &str {
        match self.unit_type {
            UnitType::Magus => "MP",
            UnitType::Alchemist => self.catalyst.as_deref().unwrap_or("Charges"),
            UnitType::Knight => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(max_hp: u32) -> BattleUnit {
        BattleUnit::new("Test", UnitType::Knight, UnitStats::new(max_hp, 20, 5))
    }

    #[test]
    fn damage_clamps_at_zero_and_kills_once() {
        let mut u = unit(30);
        assert!(!u.take_damage(10));
        assert_eq!(u.hp, 20);
        assert!(u.take_damage(500));
        assert_eq!(u.hp, 0);
        assert!(!u.is_alive());
        assert!(!u.take_damage(5));
    }

    #[test]
    fn alive_tracks_hp_through_mixed_sequences() {
        let mut u = unit(50);
        for (dmg, heal) in [(10, 5), (60, 0), (0, 30), (3, 100)] {
            u.take_damage(dmg);
            u.heal(heal);
            assert!(u.hp <= u.max_hp);
            assert_eq!(u.is_alive(), u.hp > 0);
        }
    }

    #[test]
    fn heal_caps_at_max_and_skips_dead() {
        let mut u = unit(40);
        u.take_damage(10);
        assert_eq!(u.heal(25), 10);
        assert_eq!(u.hp, 40);

        u.take_damage(40);
        assert_eq!(u.heal(10), 0);
        assert_eq!(u.hp, 0);
    }

    #[test]
    fn revive_clamps_hp() {
        let mut u = unit(40);
        u.take_damage(40);
        u.revive(0);
        assert_eq!(u.hp, 1);
        assert!(u.is_alive());

        u.take_damage(40);
        u.revive(999);
        assert_eq!(u.hp, 40);
    }

    #[test]
    fn fled_unit_is_not_alive_but_keeps_hp() {
        let mut u = unit(40);
        u.take_damage(30);
        u.mark_fled();
        assert!(!u.is_alive());
        assert!(u.has_fled());
        assert_eq!(u.hp, 10);
    }

    #[test]
    fn resource_burn_is_clamped() {
        let mut u = BattleUnit::new(
            "Mage",
            UnitType::Magus,
            UnitStats::default().with_resource(12),
        );
        assert_eq!(u.burn_resource(5), 5);
        assert_eq!(u.burn_resource(50), 7);
        assert_eq!(u.resource, 0);
        assert!(!u.spend_resource(1));
        assert_eq!(u.restore_resource(20), 12);
    }

    #[test]
    fn resource_labels_follow_unit_type() {
        let alchemist = BattleUnit::new("A", UnitType::Alchemist, UnitStats::default());
        assert_eq!(alchemist.resource_label(), "Charges");
        let alchemist = alchemist.with_catalyst("Vials");
        assert_eq!(alchemist.resource_label(), "Vials");
        let magus = BattleUnit::new("M", UnitType::Magus, UnitStats::default());
        assert_eq!(magus.resource_label(), "MP");
    }
}
