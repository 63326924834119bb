//! Bestiary of scanned enemies.
//!
//! The registry outlives individual battles. It is an owned value with shared
//! interior so the session that creates battles decides its lifetime; tests
//! simply create a fresh one.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::state::{BattleUnit, ElementType};

/// Stats captured when a unit is scanned.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanRecord {
    pub name: String,
    pub max_hp: u32,
    pub attack: i32,
    pub defense: i32,
    pub element: ElementType,
    pub crit_chance: f32,
}

impl ScanRecord {
    pub fn from_unit(unit: &BattleUnit) -> Self {
        Self {
            name: unit.name.clone(),
            max_hp: unit.max_hp,
            attack: unit.attack,
            defense: unit.defense,
            element: unit.element,
            crit_chance: unit.crit_chance,
        }
    }
}

/// Scan records keyed by unit name. Cloning shares the same records.
#[derive(Clone, Debug, Default)]
pub struct Bestiary {
    records: Arc<RwLock<HashMap<String, ScanRecord>>>,
}

impl Bestiary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records (or refreshes) the scan of `unit`.
    pub fn record_scan(&self, unit: &BattleUnit) {
        let record = ScanRecord::from_unit(unit);
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record.name.clone(), record);
    }

    pub fn is_scanned(&self, name: &str) -> bool {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    pub fn record(&self, name: &str) -> Option<ScanRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
