//! Battle content definitions and loaders.
//!
//! This crate houses the built-in skill catalog, starting inventory, sample
//! party and enemy templates, and provides loaders for RON/TOML data files:
//! - Skill and item catalogs (RON)
//! - Party rosters and enemy templates (RON)
//! - Encounters (RON, one file per encounter)
//! - Battle rules (TOML)
//!
//! All loaders deserialize battle-core types directly through serde.

pub mod builtin;
pub mod encounter;

#[cfg(feature = "loaders")]
pub mod loaders;

pub use encounter::{EncounterSpec, EnemySpec, PartyMemberSpec};

#[cfg(feature = "loaders")]
pub use loaders::{
    CatalogLoader, ConfigLoader, ContentFactory, EncounterLoader, LoadResult, PartyLoader,
};
