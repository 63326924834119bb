//! Content factory for assembling battle content from a data directory.

use std::path::{Path, PathBuf};

use battle_core::{AiPattern, BattleConfig, Catalog, EnemyAi, UnitType};
use tracing::{debug, warn};

use crate::builtin;
use crate::encounter::{EncounterSpec, EnemySpec, PartyMemberSpec};
use crate::loaders::encounter::TemplateFile;
use crate::loaders::{
    CatalogLoader, ConfigLoader, EncounterLoader, LoadResult, PartyLoader, read_file,
};

/// Content factory that loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml
/// ├── catalog.ron
/// ├── party.ron
/// ├── templates.ron
/// └── encounters/
///     ├── ford_ambush.ron
///     └── crypt_lord.ron
/// ```
///
/// Every `*_or_builtin` method falls back to the compiled-in content when
/// the file is absent. A file that exists but fails to parse is an error.
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle rules from `config.toml`.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        ConfigLoader::load(&self.data_dir.join("config.toml"))
    }

    pub fn load_config_or_default(&self) -> LoadResult<BattleConfig> {
        self.or_fallback("config.toml", ConfigLoader::load, BattleConfig::default)
    }

    /// Load skills and the starting inventory from `catalog.ron`.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        CatalogLoader::load(&self.data_dir.join("catalog.ron"))
    }

    pub fn load_catalog_or_builtin(&self) -> LoadResult<Catalog> {
        self.or_fallback("catalog.ron", CatalogLoader::load, builtin::catalog)
    }

    pub fn load_party_or_builtin(&self) -> LoadResult<Vec<PartyMemberSpec>> {
        self.or_fallback("party.ron", PartyLoader::load, builtin::party)
    }

    /// Load enemy templates from `templates.ron`.
    pub fn load_templates_or_builtin(&self) -> LoadResult<Vec<EnemySpec>> {
        let load = |path: &Path| -> LoadResult<Vec<EnemySpec>> {
            let content = read_file(path)?;
            let file: TemplateFile = ron::from_str(&content)
                .map_err(|e| anyhow::anyhow!("Failed to parse templates RON: {}", e))?;
            Ok(file.templates)
        };
        self.or_fallback("templates.ron", load, builtin::enemy_templates)
    }

    /// Load an encounter from `encounters/{name}.ron`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterSpec> {
        let path = self.data_dir.join("encounters").join(format!("{}.ron", name));
        EncounterLoader::load(&path)
    }

    /// Names of every encounter file, sorted.
    pub fn list_encounters(&self) -> LoadResult<Vec<String>> {
        let dir = self.data_dir.join("encounters");
        let entries = std::fs::read_dir(&dir)
            .map_err(|e| anyhow::anyhow!("Failed to read directory {}: {}", dir.display(), e))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if !path.extension().is_some_and(|ext| ext == "ron") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Builds a fresh strategy for `pattern`. Basic enemies draw on the
    /// catalog's skill set for their unit type.
    pub fn enemy_ai(pattern: AiPattern, catalog: &Catalog, unit_type: UnitType) -> Box<dyn EnemyAi> {
        pattern.create(catalog.enemy_skills(unit_type))
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn or_fallback<T>(
        &self,
        file: &str,
        load: impl FnOnce(&Path) -> LoadResult<T>,
        fallback: impl FnOnce() -> T,
    ) -> LoadResult<T> {
        let path = self.data_dir.join(file);
        if path.is_file() {
            debug!(path = %path.display(), "Loading content file");
            load(&path)
        } else {
            warn!(path = %path.display(), "Content file missing; using built-in content");
            Ok(fallback())
        }
    }
}
