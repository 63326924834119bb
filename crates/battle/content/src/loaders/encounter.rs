//! Encounter and party loaders.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::encounter::{EncounterSpec, EnemySpec, PartyMemberSpec};
use crate::loaders::{LoadResult, read_file};

/// Loader for [`EncounterSpec`] from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    pub fn load(path: &Path) -> LoadResult<EncounterSpec> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<EncounterSpec> {
        let encounter: EncounterSpec = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter RON: {}", e))?;
        anyhow::ensure!(
            !encounter.enemies.is_empty(),
            "Encounter '{}' has no enemies",
            encounter.name
        );
        if let Some(enemy) = encounter.enemies.iter().find(|e| e.hp == 0) {
            anyhow::bail!("Enemy '{}' starts with zero HP", enemy.name);
        }
        Ok(encounter)
    }
}

/// Party roster structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyFile {
    pub members: Vec<PartyMemberSpec>,
}

/// Loader for the player party from RON files.
pub struct PartyLoader;

impl PartyLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<PartyMemberSpec>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<PartyMemberSpec>> {
        let party: PartyFile = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse party RON: {}", e))?;
        anyhow::ensure!(!party.members.is_empty(), "Party has no members");
        Ok(party.members)
    }
}

/// Enemy template list for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateFile {
    pub templates: Vec<EnemySpec>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{AiPattern, ElementType, UnitType};

    #[test]
    fn encounter_fills_omitted_fields() {
        let encounter = EncounterLoader::parse(
            r#"(
                name: "Crypt",
                boss: true,
                enemies: [
                    (name: "Vampire", pattern: Vampire, element: Umbra, hp: 100, attack: 22),
                    (name: "Grunt"),
                ],
            )"#,
        )
        .unwrap();
        assert!(encounter.boss);
        assert_eq!(encounter.enemies[0].pattern, AiPattern::Vampire);
        assert_eq!(encounter.enemies[0].element, ElementType::Umbra);
        assert_eq!(encounter.enemies[0].defense, 5);
        assert_eq!(encounter.enemies[1].pattern, AiPattern::Basic);
        assert_eq!(encounter.enemies[1].hp, 100);
    }

    #[test]
    fn empty_encounter_is_rejected() {
        let err = EncounterLoader::parse(r#"(name: "Nothing", enemies: [])"#).unwrap_err();
        assert!(err.to_string().contains("no enemies"));
    }

    #[test]
    fn party_members_parse() {
        let party = PartyLoader::parse(
            r#"(members: [
                (name: "Selene", unit_type: Magus, resource: 40),
                (name: "Aldric", shield: true),
            ])"#,
        )
        .unwrap();
        assert_eq!(party.len(), 2);
        assert_eq!(party[0].unit_type, UnitType::Magus);
        assert!(party[1].shield);
    }
}
