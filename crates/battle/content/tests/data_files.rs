//! The shipped data directory stays in sync with the built-in content.

use std::path::PathBuf;

use battle_content::{ContentFactory, builtin};
use battle_core::BattleConfig;

fn factory() -> ContentFactory {
    ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
}

#[test]
fn catalog_file_matches_builtin() {
    assert_eq!(factory().load_catalog().unwrap(), builtin::catalog());
}

#[test]
fn party_file_matches_builtin() {
    assert_eq!(factory().load_party_or_builtin().unwrap(), builtin::party());
}

#[test]
fn config_file_matches_defaults() {
    assert_eq!(factory().load_config().unwrap(), BattleConfig::default());
}

#[test]
fn every_encounter_loads() {
    let factory = factory();
    let names = factory.list_encounters().unwrap();
    assert_eq!(names, ["crypt_lord", "drone_swarm", "ford_ambush"]);

    for name in names {
        let encounter = factory.load_encounter(&name).unwrap();
        assert!(!encounter.enemies.is_empty(), "{name}");
    }
    assert!(factory.load_encounter("crypt_lord").unwrap().boss);
}
