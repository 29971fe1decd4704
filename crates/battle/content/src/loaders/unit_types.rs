//! Unit-type catalog loader.

use std::collections::HashSet;
use std::path::Path;

use battle_core::{UnitAttack, UnitAttackType, UnitType, UnitTypeCatalog, UnitTypeId};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// Unit catalog structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitCatalog {
    pub units: Vec<UnitType>,
}

/// Loader for unit-type catalogs from RON files.
pub struct UnitTypeLoader;

impl UnitTypeLoader {
    /// Load a unit catalog from a RON file.
    ///
    /// Fails when an id repeats, or when a summon or transformation names a
    /// unit type the catalog does not define.
    pub fn load(path: &Path) -> LoadResult<UnitTypeCatalog> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<UnitTypeCatalog> {
        let catalog: UnitCatalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit catalog RON: {}", e))?;
        Self::validate(&catalog.units)?;

        Ok(catalog.units.into_iter().collect())
    }

    fn validate(units: &[UnitType]) -> LoadResult<()> {
        let mut ids = HashSet::new();
        for unit_type in units {
            if !ids.insert(&unit_type.id) {
                anyhow::bail!("Duplicate unit type '{}'", unit_type.id);
            }
        }

        for unit_type in units {
            if unit_type.hit_points == 0 {
                anyhow::bail!("Unit type '{}' has no hit points", unit_type.id);
            }
            if unit_type.armor > 100 {
                anyhow::bail!("Unit type '{}' has armor above 100", unit_type.id);
            }
            for attack in attacks_of(unit_type) {
                validate_attack(unit_type, attack, &ids)?;
            }
        }
        Ok(())
    }
}

/// Main, secondary and alternative attacks of a unit type.
fn attacks_of(unit_type: &UnitType) -> impl Iterator<Item = &UnitAttack> {
    let main = &unit_type.main_attack;
    std::iter::once(main)
        .chain(main.alternative.as_deref())
        .chain(unit_type.secondary_attack.as_ref())
}

fn validate_attack(
    unit_type: &UnitType,
    attack: &UnitAttack,
    ids: &HashSet<&UnitTypeId>,
) -> LoadResult<()> {
    if attack.accuracy > 100 {
        anyhow::bail!(
            "Unit type '{}': {} attack accuracy {} exceeds 100",
            unit_type.id,
            attack.attack_type,
            attack.accuracy
        );
    }

    let needs_unit_type = matches!(
        attack.attack_type,
        UnitAttackType::Summon | UnitAttackType::TransformSelf | UnitAttackType::TransformEnemy
    );
    match (&attack.transform_unit_type, needs_unit_type) {
        (None, true) => anyhow::bail!(
            "Unit type '{}': {} attack has no transform_unit_type",
            unit_type.id,
            attack.attack_type
        ),
        (Some(target), _) if !ids.contains(target) => anyhow::bail!(
            "Unit type '{}': {} attack references unknown unit type '{}'",
            unit_type.id,
            attack.attack_type,
            target
        ),
        _ => Ok(()),
    }
}
