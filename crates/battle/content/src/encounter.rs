//! Serializable descriptions of party members and enemy line-ups.

use battle_core::{
    AiPattern, BattleUnit, DefensiveGear, ElementType, RetreatPolicy, UnitStats, UnitType,
};

/// One enemy slot in an encounter.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnemySpec {
    pub name: String,
    pub pattern: AiPattern,
    pub unit_type: UnitType,
    pub element: ElementType,
    pub hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub crit_chance: f32,
}

impl Default for EnemySpec {
    fn default() -> Self {
        Self {
            name: "Enemy".into(),
            pattern: AiPattern::Basic,
            unit_type: UnitType::Knight,
            element: ElementType::None,
            hp: UnitStats::DEFAULT_MAX_HP,
            attack: UnitStats::DEFAULT_ATTACK,
            defense: UnitStats::DEFAULT_DEFENSE,
            crit_chance: UnitStats::DEFAULT_CRIT_CHANCE,
        }
    }
}

impl EnemySpec {
    pub fn stats(&self) -> UnitStats {
        UnitStats::new(self.hp, self.attack, self.defense).with_crit_chance(self.crit_chance)
    }

    pub fn into_unit(self) -> BattleUnit {
        let stats = self.stats();
        BattleUnit::new(self.name, self.unit_type, stats).with_element(self.element)
    }
}

/// A player-controlled combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PartyMemberSpec {
    pub name: String,
    pub unit_type: UnitType,
    pub element: ElementType,
    pub hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub crit_chance: f32,
    /// MP for a Magus, catalyst charges for an Alchemist.
    pub resource: u32,
    pub dodge_bonus: f32,
    pub shield: bool,
    pub catalyst: Option<String>,
}

impl Default for PartyMemberSpec {
    fn default() -> Self {
        Self {
            name: "Hero".into(),
            unit_type: UnitType::Knight,
            element: ElementType::None,
            hp: UnitStats::DEFAULT_MAX_HP,
            attack: UnitStats::DEFAULT_ATTACK,
            defense: UnitStats::DEFAULT_DEFENSE,
            crit_chance: UnitStats::DEFAULT_CRIT_CHANCE,
            resource: 0,
            dodge_bonus: 0.0,
            shield: false,
            catalyst: None,
        }
    }
}

impl PartyMemberSpec {
    pub fn into_unit(self) -> BattleUnit {
        let stats = UnitStats::new(self.hp, self.attack, self.defense)
            .with_crit_chance(self.crit_chance)
            .with_resource(self.resource);
        let unit = BattleUnit::new(self.name, self.unit_type, stats)
            .with_element(self.element)
            .with_gear(DefensiveGear {
                dodge_bonus: self.dodge_bonus,
                has_shield: self.shield,
            });
        match self.catalyst {
            Some(catalyst) => unit.with_catalyst(catalyst),
            None => unit,
        }
    }
}

/// A named enemy line-up.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterSpec {
    pub name: String,
    /// Boss encounters refuse ordinary flee attempts.
    pub boss: bool,
    pub enemies: Vec<EnemySpec>,
}

impl EncounterSpec {
    /// Retreat policy for this encounter given the configured flee chance.
    pub fn retreat_policy(&self, flee_chance: f32) -> RetreatPolicy {
        RetreatPolicy {
            flee_chance,
            boss: self.boss,
        }
    }

    /// Enemy units paired with their patterns, in declaration order.
    pub fn into_enemies(self) -> Vec<(BattleUnit, AiPattern)> {
        self.enemies
            .into_iter()
            .map(|spec| {
                let pattern = spec.pattern;
                (spec.into_unit(), pattern)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enemy_defaults_match_basic_template() {
        let unit = EnemySpec::default().into_unit();
        assert_eq!(unit.max_hp, 100);
        assert_eq!(unit.attack, 20);
        assert_eq!(unit.defense, 5);
        assert!(unit.is_alive());
    }

    #[test]
    fn party_member_carries_gear_and_catalyst() {
        let spec = PartyMemberSpec {
            name: "Mira".into(),
            unit_type: UnitType::Alchemist,
            resource: 6,
            dodge_bonus: 0.05,
            catalyst: Some("Vials".into()),
            ..PartyMemberSpec::default()
        };
        let unit = spec.into_unit();
        assert_eq!(unit.resource, 6);
        assert_eq!(unit.max_resource, 6);
        assert_eq!(unit.gear.dodge_bonus, 0.05);
        assert_eq!(unit.resource_label(), "Vials");
    }

    #[test]
    fn boss_encounter_blocks_flee() {
        let encounter = EncounterSpec {
            name: "Lair".into(),
            boss: true,
            enemies: vec![EnemySpec::default()],
        };
        assert!(!encounter.retreat_policy(0.75).can_retreat());
        let enemies = encounter.into_enemies();
        assert_eq!(enemies.len(), 1);
        assert_eq!(enemies[0].1, AiPattern::Basic);
    }
}
