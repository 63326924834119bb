//! Skill and item templates.
//!
//! Definitions are plain data. They are cloned into intents when an AI needs
//! an adjusted variant (different multiplier or element), so a template is
//! never mutated while a battle runs.

use std::collections::HashMap;

use crate::state::{ElementType, SkillTargetType, StatusEffectType, UnitType};

/// Status effect carried by a skill, applied on a successful proc roll.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusRider {
    pub kind: StatusEffectType,
    pub duration: u32,
    pub value: f32,
    /// Probability in `[0, 1]` that the effect lands.
    pub chance: f32,
}

impl StatusRider {
    pub const fn new(kind: StatusEffectType, duration: u32, value: f32, chance: f32) -> Self {
        Self {
            kind,
            duration,
            value,
            chance,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkillDefinition {
    pub name: String,
    pub cost: u32,
    pub element: ElementType,
    /// Zero for pure support skills.
    pub damage_multiplier: f32,
    pub heal_amount: u32,
    /// Fraction of dealt damage returned to the caster as HP.
    pub lifesteal: f32,
    pub target: SkillTargetType,
    pub status: Option<StatusRider>,
    pub resource_burn: u32,
    pub destroys_item: bool,
    /// Hits every living unit of the opposing side.
    pub area: bool,
}

impl Default for SkillDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            cost: 0,
            element: ElementType::None,
            damage_multiplier: 0.0,
            heal_amount: 0,
            lifesteal: 0.0,
            target: SkillTargetType::Enemy,
            status: None,
            resource_burn: 0,
            destroys_item: false,
            area: false,
        }
    }
}

impl SkillDefinition {
    /// Offensive skill aimed at the opposing side.
    pub fn strike(name: impl Into<String>, element: ElementType, damage_multiplier: f32) -> Self {
        Self {
            name: name.into(),
            element,
            damage_multiplier,
            ..Self::default()
        }
    }

    /// Pure heal on an ally.
    pub fn heal(name: impl Into<String>, heal_amount: u32, target: SkillTargetType) -> Self {
        Self {
            name: name.into(),
            heal_amount,
            target,
            ..Self::default()
        }
    }

    /// Non-damaging skill whose only effect is a status rider (or nothing).
    pub fn support(name: impl Into<String>, target: SkillTargetType) -> Self {
        Self {
            name: name.into(),
            target,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_cost(mut self, cost: u32) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_status(mut self, kind: StatusEffectType, duration: u32, value: f32, chance: f32) -> Self {
        self.status = Some(StatusRider::new(kind, duration, value, chance));
        self
    }

    #[must_use]
    pub fn with_lifesteal(mut self, ratio: f32) -> Self {
        self.lifesteal = ratio;
        self
    }

    #[must_use]
    pub fn with_resource_burn(mut self, amount: u32) -> Self {
        self.resource_burn = amount;
        self
    }

    #[must_use]
    pub fn destroying_items(mut self) -> Self {
        self.destroys_item = true;
        self
    }

    #[must_use]
    pub fn area(mut self) -> Self {
        self.area = true;
        self
    }

    /// Copy of this skill with a different element.
    #[must_use]
    pub fn with_element(&self, element: ElementType) -> Self {
        Self {
            element,
            ..self.clone()
        }
    }

    /// Copy of this skill with a different damage multiplier.
    #[must_use]
    pub fn with_damage_multiplier(&self, damage_multiplier: f32) -> Self {
        Self {
            damage_multiplier,
            ..self.clone()
        }
    }

    pub fn is_offensive(&self) -> bool {
        self.damage_multiplier > 0.0
    }

    /// Ally-targeted skill that only carries an attack or defense buff.
    pub fn is_buff(&self) -> bool {
        self.target == SkillTargetType::Ally
            && self.heal_amount == 0
            && self.status.is_some_and(|s| s.kind.is_buff())
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ItemDefinition {
    pub name: String,
    pub heal_hp: u32,
    pub restore_resource: u32,
    pub damage: u32,
    pub damage_element: ElementType,
    pub target: SkillTargetType,
    /// Revives a dead ally. Revive items have no other effect.
    pub revive: bool,
    pub cures: StatusEffectType,
    /// Guarantees a successful retreat.
    pub escape: bool,
}

impl Default for ItemDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            heal_hp: 0,
            restore_resource: 0,
            damage: 0,
            damage_element: ElementType::None,
            target: SkillTargetType::Ally,
            revive: false,
            cures: StatusEffectType::None,
            escape: false,
        }
    }
}

impl ItemDefinition {
    pub fn new(name: impl Into<String>, target: SkillTargetType) -> Self {
        Self {
            name: name.into(),
            target,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn healing(mut self, amount: u32) -> Self {
        self.heal_hp = amount;
        self
    }

    #[must_use]
    pub fn restoring(mut self, amount: u32) -> Self {
        self.restore_resource = amount;
        self
    }

    #[must_use]
    pub fn damaging(mut self, amount: u32, element: ElementType) -> Self {
        self.damage = amount;
        self.damage_element = element;
        self
    }

    #[must_use]
    pub fn curing(mut self, kind: StatusEffectType) -> Self {
        self.cures = kind;
        self
    }

    #[must_use]
    pub fn reviving(mut self) -> Self {
        self.revive = true;
        self
    }

    #[must_use]
    pub fn escaping(mut self) -> Self {
        self.escape = true;
        self
    }
}

/// Starting quantity of an item in the shared inventory.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemStock {
    pub item: ItemDefinition,
    pub quantity: u32,
}

/// Skill sets per unit type plus the party's starting inventory.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Catalog {
    pub player_skills: HashMap<UnitType, Vec<SkillDefinition>>,
    pub enemy_skills: HashMap<UnitType, Vec<SkillDefinition>>,
    pub starting_inventory: Vec<ItemStock>,
}

impl Catalog {
    pub fn player_skills(&self, unit_type: UnitType) -> &[SkillDefinition] {
        self.player_skills
            .get(&unit_type)
            .map_or(&[], Vec::as_slice)
    }

    pub fn enemy_skills(&self, unit_type: UnitType) -> &[SkillDefinition] {
        self.enemy_skills
            .get(&unit_type)
            .map_or(&[], Vec::as_slice)
    }
}
