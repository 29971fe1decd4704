//! Processors for what happens to a unit rather than what it does: death,
//! retreat, defending and waiting.

use crate::context::BattleContext;
use crate::error::BattleResult;
use crate::model::{UnitId, UnitStatus};
use crate::processor::lifecycle;

/// Commits a unit's death.
///
/// Experience shares are fixed when the killing blow lands so the portraits
/// can show them before the processor is applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitDeathProcessor {
    pub unit: UnitId,
    /// `(receiver, experience)` for each surviving, non-summoned enemy.
    pub experience: Vec<(UnitId, u32)>,
}

impl UnitDeathProcessor {
    pub fn new(battle: &BattleContext, unit: UnitId) -> BattleResult<Self> {
        let dead = battle.unit(unit)?;
        let receivers: Vec<UnitId> = battle
            .active_units(dead.side.opposite())
            .filter(|enemy| !enemy.is_summoned())
            .map(|enemy| enemy.id)
            .collect();
        let share = match receivers.len() {
            0 => 0,
            count => dead.unit_type.death_experience / count as u32,
        };
        Ok(Self {
            unit,
            experience: receivers.into_iter().map(|id| (id, share)).collect(),
        })
    }

    pub fn process(&self, battle: &mut BattleContext) -> BattleResult<()> {
        for &(receiver, experience) in &self.experience {
            battle.unit_mut(receiver)?.experience += experience;
        }
        lifecycle::release_unit(battle, self.unit)
    }
}

/// Marks a unit as leaving; it goes at the start of its next turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitRetreatingProcessor {
    pub unit: UnitId,
}

impl UnitRetreatingProcessor {
    pub fn new(unit: UnitId) -> Self {
        Self { unit }
    }

    pub fn process(&self, battle: &mut BattleContext) -> BattleResult<()> {
        battle.unit_mut(self.unit)?.status.insert(UnitStatus::RETREATING);
        Ok(())
    }
}

/// Removes a retreating unit from the battle with the same clean-up as a
/// death, minus experience.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnitRetreatedProcessor {
    pub unit: UnitId,
}

impl UnitRetreatedProcessor {
    pub fn new(unit: UnitId) -> Self {
        Self { unit }
    }

    pub fn process(&self, battle: &mut BattleContext) -> BattleResult<()> {
        let unit = battle.unit_mut(self.unit)?;
        unit.status.remove(UnitStatus::RETREATING);
        unit.status.insert(UnitStatus::RETREATED);
        lifecycle::release_unit(battle, self.unit)
    }
}
