//! Headless battle simulator.
//!
//! Runs one encounter with the automated party policy and streams the
//! battle's events to stdout. Configuration comes from `BATTLE_*`
//! environment variables (see [`config::SimConfig::from_env`]), optionally
//! loaded from a `.env` file.
mod config;
mod logging;
mod printer;

use std::collections::HashMap;

use anyhow::{Context, Result};
use tracing::info;

use battle_content::encounter::{EncounterSpec, PartyMemberSpec};
use battle_content::{CatalogLoader, ConfigLoader, ContentFactory, builtin};
use battle_core::{BattleConfig, BattleOutcome, Catalog, Side};
use battle_runtime::{AutoPartyPolicy, BattleRuntime, EventBus, RuntimeConfig, Topic, TimingConfig};

use crate::config::SimConfig;
use crate::printer::Printer;

/// Per-topic capacity. A whole instant battle can be published before the
/// printer drains anything.
const EVENT_BUFFER: usize = 4096;

struct Content {
    config: BattleConfig,
    catalog: Catalog,
    party: Vec<PartyMemberSpec>,
    encounter: EncounterSpec,
}

fn load_content(sim: &SimConfig) -> Result<Content> {
    let mut content = match &sim.data_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            let encounter = match &sim.encounter {
                Some(name) => factory.load_encounter(name)?,
                None => match factory.list_encounters()?.first() {
                    Some(name) => factory.load_encounter(name)?,
                    None => builtin::sample_encounter(),
                },
            };
            Content {
                config: factory.load_config_or_default()?,
                catalog: factory.load_catalog_or_builtin()?,
                party: factory.load_party_or_builtin()?,
                encounter,
            }
        }
        None => {
            if let Some(name) = &sim.encounter {
                anyhow::bail!("BATTLE_ENCOUNTER={name} requires BATTLE_DATA_DIR");
            }
            Content {
                config: BattleConfig::default(),
                catalog: builtin::catalog(),
                party: builtin::party(),
                encounter: builtin::sample_encounter(),
            }
        }
    };

    if let Some(path) = &sim.config_path {
        content.config = ConfigLoader::load(path)
            .with_context(|| format!("loading battle config {}", path.display()))?;
    }
    if let Some(path) = &sim.catalog_path {
        content.catalog = CatalogLoader::load(path)
            .with_context(|| format!("loading catalog {}", path.display()))?;
    }
    Ok(content)
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let sim = SimConfig::from_env();
    let _log_guard = logging::setup_logging(sim.log_dir.as_deref())?;

    let content = load_content(&sim)?;
    let retreat = content.encounter.retreat_policy(content.config.flee_chance);
    info!(
        encounter = %content.encounter.name,
        boss = content.encounter.boss,
        enemies = content.encounter.enemies.len(),
        seed = ?sim.seed,
        "Starting battle"
    );

    let timing = if sim.instant {
        TimingConfig::instant()
    } else {
        TimingConfig::default()
    };

    let event_bus = EventBus::with_capacity(EVENT_BUFFER);
    let receivers = event_bus.subscribe_multiple(&Topic::ALL);

    let mut builder = BattleRuntime::builder()
        .config(RuntimeConfig {
            battle_config: content.config,
            timing,
            event_buffer_size: EVENT_BUFFER,
            ..RuntimeConfig::default()
        })
        .event_bus(event_bus)
        .party(content.party.into_iter().map(PartyMemberSpec::into_unit))
        .catalog(content.catalog.clone())
        .retreat(retreat)
        .party_policy(AutoPartyPolicy::new(content.catalog));
    for (unit, pattern) in content.encounter.into_enemies() {
        builder = builder.enemy_with_pattern(unit, pattern);
    }
    if let Some(seed) = sim.seed {
        builder = builder.seed(seed);
    }
    let runtime = builder.build().await?;

    let snapshot = runtime.handle().snapshot().await?;
    let names: HashMap<_, _> = snapshot
        .units
        .iter()
        .map(|u| (u.id, u.name.clone()))
        .collect();
    let printer = tokio::spawn(Printer::new(sim.format, names).run(receivers));

    let handle = runtime.handle();
    let outcome = runtime.wait().await?;
    let final_state = handle.snapshot().await?;
    // the worker stops once every handle is gone, which closes the printer
    drop(handle);
    printer.await??;

    for unit in &final_state.units {
        let side = match unit.side {
            Side::Party => "party",
            Side::Enemy => "enemy",
        };
        let status = if unit.has_fled() {
            "fled"
        } else if unit.is_alive() {
            "alive"
        } else {
            "dead"
        };
        info!(
            name = %unit.name,
            side,
            hp = unit.hp,
            max_hp = unit.max_hp,
            status,
            "Final state"
        );
    }
    match outcome {
        BattleOutcome::Lost => tracing::warn!(turns = final_state.turn, "The party was defeated"),
        _ => info!(%outcome, turns = final_state.turn, "Battle finished"),
    }
    Ok(())
}
