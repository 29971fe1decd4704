use super::{BattleSide, UnitId};

/// Ordered unit ids of one side.
///
/// Slots are repointed in place ([`Squad::replace`]) when a unit transforms,
/// is summoned over a fallen unit, or reverts; positions live on the units.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Squad {
    pub side: BattleSide,
    units: Vec<UnitId>,
}

impl Squad {
    pub fn new(side: BattleSide) -> Self {
        Self {
            side,
            units: Vec::new(),
        }
    }

    pub fn units(&self) -> &[UnitId] {
        &self.units
    }

    pub fn contains(&self, unit: UnitId) -> bool {
        self.units.contains(&unit)
    }

    pub fn push(&mut self, unit: UnitId) {
        self.units.push(unit);
    }

    /// Swaps `old` for `new` keeping the slot order. Returns `false` if `old`
    /// is not in the squad.
    pub fn replace(&mut self, old: UnitId, new: UnitId) -> bool {
        match self.units.iter_mut().find(|id| **id == old) {
            Some(slot) => {
                *slot = new;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, unit: UnitId) -> bool {
        let before = self.units.len();
        self.units.retain(|id| *id != unit);
        before != self.units.len()
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}
