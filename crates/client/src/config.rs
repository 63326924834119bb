//! Simulator configuration from environment variables.
use std::env;
use std::path::PathBuf;

/// How battle events are written to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One readable line per event.
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown output format '{other}'")),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimConfig {
    pub seed: Option<u64>,
    /// Data directory with `catalog.ron`, `party.ron` and `encounters/`.
    pub data_dir: Option<PathBuf>,
    /// Overrides `data_dir/config.toml`.
    pub config_path: Option<PathBuf>,
    /// Overrides `data_dir/catalog.ron`.
    pub catalog_path: Option<PathBuf>,
    /// Encounter file name under `data_dir/encounters`, without extension.
    pub encounter: Option<String>,
    /// Skip cosmetic pauses.
    pub instant: bool,
    pub log_dir: Option<PathBuf>,
    pub format: OutputFormat,
}

impl SimConfig {
    /// Construct configuration from process environment variables.
    ///
    /// Environment variables:
    /// - `BATTLE_SEED` - Seed for the battle's random source (default: entropy)
    /// - `BATTLE_DATA_DIR` - Content directory (default: built-in content)
    /// - `BATTLE_CONFIG` - Battle rules TOML file
    /// - `BATTLE_CATALOG` - Skill and item catalog RON file
    /// - `BATTLE_ENCOUNTER` - Encounter name (default: built-in sample)
    /// - `BATTLE_INSTANT` - Disable cosmetic pauses (default: false)
    /// - `BATTLE_LOG_DIR` - Also write logs to `battle-sim.log` in this directory
    /// - `BATTLE_FORMAT` - `text` or `json` (default: text)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| lookup(key).filter(|v| !v.is_empty()).map(PathBuf::from);

        let mut config = Self {
            seed: read_env(&lookup, "BATTLE_SEED"),
            data_dir: path("BATTLE_DATA_DIR"),
            config_path: path("BATTLE_CONFIG"),
            catalog_path: path("BATTLE_CATALOG"),
            encounter: lookup("BATTLE_ENCOUNTER").filter(|v| !v.is_empty()),
            log_dir: path("BATTLE_LOG_DIR"),
            format: read_env(&lookup, "BATTLE_FORMAT").unwrap_or_default(),
            ..Self::default()
        };

        if let Some(instant) = read_env::<bool>(&lookup, "BATTLE_INSTANT") {
            config.instant = instant;
        } else if lookup("BATTLE_INSTANT").is_some_and(|v| v.is_empty() || v == "1") {
            // Also accept a bare or numeric flag as "true"
            config.instant = true;
        }

        config
    }
}

fn read_env<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    lookup(key)?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> SimConfig {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        SimConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_without_variables() {
        let config = config(&[]);
        assert_eq!(config.seed, None);
        assert!(!config.instant);
        assert_eq!(config.format, OutputFormat::Text);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn reads_every_variable() {
        let config = config(&[
            ("BATTLE_SEED", "42"),
            ("BATTLE_DATA_DIR", "data"),
            ("BATTLE_CONFIG", "rules.toml"),
            ("BATTLE_CATALOG", "skills.ron"),
            ("BATTLE_ENCOUNTER", "crypt_lord"),
            ("BATTLE_INSTANT", "true"),
            ("BATTLE_LOG_DIR", "/tmp/logs"),
            ("BATTLE_FORMAT", "JSON"),
        ]);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.data_dir, Some(PathBuf::from("data")));
        assert_eq!(config.config_path, Some(PathBuf::from("rules.toml")));
        assert_eq!(config.catalog_path, Some(PathBuf::from("skills.ron")));
        assert_eq!(config.encounter.as_deref(), Some("crypt_lord"));
        assert!(config.instant);
        assert_eq!(config.log_dir, Some(PathBuf::from("/tmp/logs")));
        assert_eq!(config.format, OutputFormat::Json);
    }

    #[test]
    fn malformed_values_fall_back() {
        let config = config(&[("BATTLE_SEED", "abc"), ("BATTLE_INSTANT", "1")]);
        assert_eq!(config.seed, None);
        assert!(config.instant);
    }
}
