//! Built-in content used when no data files are supplied.

use std::collections::HashMap;

use battle_core::{
    AiPattern, Catalog, ElementType, ItemDefinition, ItemStock, SkillDefinition,
    SkillTargetType, StatusEffectType, UnitType,
};

use crate::encounter::{EncounterSpec, EnemySpec, PartyMemberSpec};

/// Player and enemy skill sets plus the party's starting inventory.
pub fn catalog() -> Catalog {
    Catalog {
        player_skills: player_skills(),
        enemy_skills: enemy_skills(),
        starting_inventory: starting_inventory(),
    }
}

fn player_skills() -> HashMap<UnitType, Vec<SkillDefinition>> {
    HashMap::from([
        (
            UnitType::Alchemist,
            vec![
                SkillDefinition::strike("Ignis Toss", ElementType::Ignis, 1.5)
                    .with_cost(1)
                    .with_status(StatusEffectType::Burn, 2, 5.0, 0.3),
                SkillDefinition::heal("Mending Salve", 30, SkillTargetType::SelfTarget)
                    .with_cost(1),
                SkillDefinition::strike("Aqua Splash", ElementType::Aqua, 2.0).with_cost(2),
            ],
        ),
        (
            UnitType::Magus,
            vec![
                SkillDefinition::strike("Lux Bolt", ElementType::Lux, 1.5).with_cost(8),
                SkillDefinition::strike("Umbra Drain", ElementType::Umbra, 1.5)
                    .with_cost(10)
                    .with_lifesteal(0.5)
                    .with_status(StatusEffectType::AtkDown, 2, 0.75, 0.5),
                SkillDefinition::heal("Arcane Shield", 20, SkillTargetType::SelfTarget)
                    .with_cost(5),
            ],
        ),
        (
            UnitType::Knight,
            vec![
                SkillDefinition::strike("Power Strike", ElementType::None, 2.0),
                SkillDefinition::strike("Shield Bash", ElementType::None, 1.0)
                    .with_status(StatusEffectType::Stun, 1, 0.0, 0.25),
            ],
        ),
    ])
}

/// Unit-type skill sets drawn on by [`AiPattern::Basic`]. All free to cast.
fn enemy_skills() -> HashMap<UnitType, Vec<SkillDefinition>> {
    HashMap::from([
        (
            UnitType::Magus,
            vec![
                SkillDefinition::strike("Dark Pulse", ElementType::Umbra, 1.8)
                    .with_status(StatusEffectType::AtkDown, 2, 0.75, 0.4),
                SkillDefinition::heal("Shadow Heal", 25, SkillTargetType::Ally),
                SkillDefinition::strike("Lux Blast", ElementType::Lux, 2.0)
                    .with_status(StatusEffectType::Burn, 2, 5.0, 0.3),
            ],
        ),
        (
            UnitType::Knight,
            vec![
                SkillDefinition::strike("Heavy Swing", ElementType::None, 2.0)
                    .with_status(StatusEffectType::Stun, 1, 0.0, 0.2),
                SkillDefinition::support("War Cry", SkillTargetType::Ally)
                    .with_status(StatusEffectType::AtkUp, 2, 1.25, 1.0),
            ],
        ),
        (
            UnitType::Alchemist,
            vec![
                SkillDefinition::strike("Venom Splash", ElementType::Aqua, 1.0)
                    .with_status(StatusEffectType::Poison, 3, 4.0, 0.5),
            ],
        ),
    ])
}

fn starting_inventory() -> Vec<ItemStock> {
    let stock = |item, quantity| ItemStock { item, quantity };
    vec![
        stock(
            ItemDefinition::new("Health Potion", SkillTargetType::Ally).healing(40),
            3,
        ),
        stock(
            ItemDefinition::new("Ether", SkillTargetType::Ally).restoring(5),
            2,
        ),
        stock(
            ItemDefinition::new("Fire Bomb", SkillTargetType::Enemy)
                .damaging(25, ElementType::Ignis),
            2,
        ),
        stock(
            ItemDefinition::new("Antidote", SkillTargetType::Ally)
                .healing(10)
                .curing(StatusEffectType::Poison),
            1,
        ),
        stock(
            ItemDefinition::new("Phoenix Down", SkillTargetType::Ally)
                .healing(50)
                .reviving(),
            1,
        ),
        stock(
            ItemDefinition::new("Escape Flare", SkillTargetType::SelfTarget).escaping(),
            1,
        ),
    ]
}

/// Default three-member party, one of each class.
pub fn party() -> Vec<PartyMemberSpec> {
    vec![
        PartyMemberSpec {
            name: "Aldric".into(),
            unit_type: UnitType::Knight,
            element: ElementType::Terra,
            hp: 120,
            attack: 22,
            defense: 10,
            crit_chance: 0.1,
            resource: 0,
            dodge_bonus: 0.0,
            shield: true,
            catalyst: None,
        },
        PartyMemberSpec {
            name: "Mira".into(),
            unit_type: UnitType::Alchemist,
            element: ElementType::Ignis,
            hp: 90,
            attack: 18,
            defense: 6,
            crit_chance: 0.15,
            resource: 6,
            dodge_bonus: 0.05,
            shield: false,
            catalyst: Some("Vials".into()),
        },
        PartyMemberSpec {
            name: "Selene".into(),
            unit_type: UnitType::Magus,
            element: ElementType::Lux,
            hp: 80,
            attack: 20,
            defense: 5,
            crit_chance: 0.1,
            resource: 40,
            dodge_bonus: 0.1,
            shield: false,
            catalyst: None,
        },
    ]
}

/// One enemy template per pattern, tuned to show the pattern off.
pub fn enemy_templates() -> Vec<EnemySpec> {
    use AiPattern::*;
    use ElementType::*;

    let enemy = |name: &str, pattern, element, hp, attack, defense| EnemySpec {
        name: name.into(),
        pattern,
        element,
        hp,
        attack,
        defense,
        ..EnemySpec::default()
    };
    vec![
        enemy("Berserker", Berserker, Ignis, 120, 25, 5),
        enemy("Tactician", Tactician, Ventus, 100, 20, 10),
        enemy("Bodyguard", Bodyguard, Terra, 150, 15, 15),
        enemy("Sniper", Sniper, Ventus, 70, 30, 3),
        enemy("Healer Priest", HealerPriest, Lux, 80, 12, 8),
        enemy("Glass Cannon", GlassCannon, Lux, 50, 35, 2),
        enemy("Debuffer", Debuffer, Umbra, 90, 18, 8),
        enemy("Vampire", Vampire, Umbra, 100, 22, 6),
        enemy("Martyr", Martyr, Lux, 60, 10, 5),
        enemy("Mimic", Mimic, ElementType::None, 90, 20, 7),
        enemy("Coward", Coward, ElementType::None, 80, 18, 4),
        enemy("Avenger", Avenger, Ignis, 110, 20, 8),
        enemy("Ritualist", Ritualist, Umbra, 100, 28, 5),
        enemy("Swarm Drone", SwarmDrone, ElementType::None, 40, 12, 3),
        enemy("Saboteur", Saboteur, Umbra, 85, 16, 6),
        enemy("Elemental Shifter", ElementalShifter, Ignis, 100, 22, 7),
        enemy("Commander", Commander, ElementType::None, 130, 18, 12),
        enemy("Basic Enemy", Basic, ElementType::None, 100, 20, 5),
    ]
}

/// Looks up an enemy template by name, ignoring case.
pub fn enemy_template(name: &str) -> Option<EnemySpec> {
    enemy_templates()
        .into_iter()
        .find(|e| e.name.eq_ignore_ascii_case(name))
}

/// A small mixed encounter used by the demo client.
pub fn sample_encounter() -> EncounterSpec {
    let pick = |name: &str| enemy_template(name).unwrap_or_default();
    EncounterSpec {
        name: "Ambush at the Ford".into(),
        boss: false,
        enemies: vec![pick("Commander"), pick("Healer Priest"), pick("Berserker")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn catalog_covers_every_unit_type() {
        let catalog = catalog();
        for unit_type in UnitType::iter() {
            assert!(!catalog.player_skills(unit_type).is_empty());
            assert!(!catalog.enemy_skills(unit_type).is_empty());
        }
        assert!(
            catalog
                .enemy_skills
                .values()
                .flatten()
                .all(|skill| skill.cost == 0)
        );
    }

    #[test]
    fn starting_inventory_matches_item_list() {
        let names: Vec<(String, u32)> = catalog()
            .starting_inventory
            .into_iter()
            .map(|s| (s.item.name, s.quantity))
            .collect();
        assert_eq!(
            names,
            vec![
                ("Health Potion".to_string(), 3),
                ("Ether".to_string(), 2),
                ("Fire Bomb".to_string(), 2),
                ("Antidote".to_string(), 1),
                ("Phoenix Down".to_string(), 1),
                ("Escape Flare".to_string(), 1),
            ]
        );
    }

    #[test]
    fn one_template_per_pattern() {
        let templates = enemy_templates();
        for pattern in AiPattern::iter() {
            assert_eq!(
                templates.iter().filter(|t| t.pattern == pattern).count(),
                1,
                "{pattern}"
            );
        }
        assert_eq!(enemy_template("glass cannon").unwrap().attack, 35);
    }
}
