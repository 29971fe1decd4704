//! Read-only battle environment.
//!
//! Oracles expose static data the rules need but never mutate: the unit-type
//! catalog (for summons and transformations) and the rule configuration.
//! [`BattleEnv`] bundles them so processors don't couple to concrete loaders.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::BattleConfig;
use crate::model::{UnitType, UnitTypeId};

/// Lookup of unit templates by id.
pub trait UnitTypeOracle: Send + Sync {
    fn unit_type(&self, id: &UnitTypeId) -> Option<Arc<UnitType>>;

    /// Returns all known unit type ids.
    fn all_ids(&self) -> Vec<UnitTypeId> {
        Vec::new()
    }
}

/// In-memory unit-type catalog.
#[derive(Clone, Debug, Default)]
pub struct UnitTypeCatalog {
    types: HashMap<UnitTypeId, Arc<UnitType>>,
}

impl UnitTypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, unit_type: UnitType) -> Arc<UnitType> {
        let unit_type = Arc::new(unit_type);
        self.types.insert(unit_type.id.clone(), Arc::clone(&unit_type));
        unit_type
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<UnitType> for UnitTypeCatalog {
    fn from_iter<T: IntoIterator<Item = UnitType>>(iter: T) -> Self {
        let mut catalog = Self::new();
        for unit_type in iter {
            catalog.insert(unit_type);
        }
        catalog
    }
}

impl UnitTypeOracle for UnitTypeCatalog {
    fn unit_type(&self, id: &UnitTypeId) -> Option<Arc<UnitType>> {
        self.types.get(id).cloned()
    }

    fn all_ids(&self) -> Vec<UnitTypeId> {
        let mut ids: Vec<_> = self.types.keys().cloned().collect();
        ids.sort();
        ids
    }
}

/// Aggregates the read-only data processors consult.
#[derive(Clone, Copy)]
pub struct BattleEnv<'a> {
    pub config: &'a BattleConfig,
    pub unit_types: &'a dyn UnitTypeOracle,
}

impl<'a> BattleEnv<'a> {
    pub fn new(config: &'a BattleConfig, unit_types: &'a dyn UnitTypeOracle) -> Self {
        Self { config, unit_types }
    }
}

impl core::fmt::Debug for BattleEnv<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BattleEnv")
            .field("config", self.config)
            .field("unit_types", &self.unit_types.all_ids())
            .finish()
    }
}
