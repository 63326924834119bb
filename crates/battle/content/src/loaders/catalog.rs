//! Skill and item catalog loader.

use std::path::Path;

use battle_core::Catalog;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`Catalog`] from RON files.
pub struct CatalogLoader;

impl CatalogLoader {
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Catalog> {
        let catalog: Catalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;

        let free_enemy_skills = catalog.enemy_skills.values().flatten().all(|s| s.cost == 0);
        anyhow::ensure!(free_enemy_skills, "Enemy skills must not cost resource");
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{ElementType, StatusEffectType, UnitType};

    const CATALOG: &str = r#"(
        player_skills: {
            Knight: [
                (name: "Power Strike", damage_multiplier: 2.0),
                (
                    name: "Shield Bash",
                    damage_multiplier: 1.0,
                    status: Some((kind: Stun, duration: 1, value: 0.0, chance: 0.25)),
                ),
            ],
        },
        enemy_skills: {
            Magus: [(name: "Dark Pulse", element: Umbra, damage_multiplier: 1.8)],
        },
        starting_inventory: [
            (item: (name: "Health Potion", heal_hp: 40), quantity: 3),
        ],
    )"#;

    #[test]
    fn parses_partial_definitions() {
        let catalog = CatalogLoader::parse(CATALOG).unwrap();
        let knight = catalog.player_skills(UnitType::Knight);
        assert_eq!(knight.len(), 2);
        assert_eq!(knight[1].status.unwrap().kind, StatusEffectType::Stun);
        assert_eq!(catalog.enemy_skills(UnitType::Magus)[0].element, ElementType::Umbra);
        assert!(catalog.player_skills(UnitType::Magus).is_empty());
        assert_eq!(catalog.starting_inventory[0].quantity, 3);
        assert_eq!(catalog.starting_inventory[0].item.heal_hp, 40);
    }

    #[test]
    fn costly_enemy_skill_is_rejected() {
        let content = r#"(enemy_skills: { Knight: [(name: "Drain", cost: 5)] })"#;
        assert!(CatalogLoader::parse(content).is_err());
    }
}
