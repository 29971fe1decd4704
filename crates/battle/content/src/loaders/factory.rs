//! Content factory for building battle oracles from data files.

use std::path::{Path, PathBuf};

use battle_core::{BattleConfig, UnitTypeCatalog};

use crate::loaders::{ConfigLoader, LoadResult, UnitTypeLoader};

/// Content factory that loads all battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── battle.toml
/// └── units.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub const CONFIG_FILE: &'static str = "battle.toml";
    pub const UNITS_FILE: &'static str = "units.ron";

    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load battle rules and timings from `battle.toml`.
    ///
    /// A missing file is not an error: the defaults apply.
    pub fn load_config(&self) -> LoadResult<BattleConfig> {
        let path = self.data_dir.join(Self::CONFIG_FILE);
        if !path.exists() {
            return Ok(BattleConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the unit-type catalog from `units.ron`.
    pub fn load_unit_types(&self) -> LoadResult<UnitTypeCatalog> {
        let path = self.data_dir.join(Self::UNITS_FILE);
        UnitTypeLoader::load(&path)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
