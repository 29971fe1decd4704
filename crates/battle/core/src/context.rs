//! Mutable battle state shared by processors and controllers.
//!
//! [`BattleContext`] owns the unit arena, both squads and the turn queue. It is
//! owned by the battle scene and lent (`&` / `&mut`) to every processor call;
//! nothing holds on to it between calls.

use std::sync::Arc;

use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{
    BattleSide, Squad, SquadPosition, Unit, UnitAttackType, UnitId, UnitStatus, UnitType,
};
use crate::rng::BattleRng;
use crate::turn_queue::{UnitTurnQueue, initiative_order};

/// What an attack is aimed at: a unit, or an empty squad slot (summons).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AttackTarget {
    Unit(UnitId),
    Slot {
        side: BattleSide,
        position: SquadPosition,
    },
}

impl AttackTarget {
    pub fn unit(&self) -> Option<UnitId> {
        match self {
            Self::Unit(unit) => Some(*unit),
            Self::Slot { .. } => None,
        }
    }
}

impl From<UnitId> for AttackTarget {
    fn from(unit: UnitId) -> Self {
        Self::Unit(unit)
    }
}

#[derive(Clone, Debug)]
pub struct BattleContext {
    units: Vec<Unit>,
    squads: [Squad; 2],
    pub turn_queue: UnitTurnQueue,
    round: u32,
    /// Set while an attacks-twice unit performs its second attack.
    pub is_second_attack: bool,
}

impl Default for BattleContext {
    fn default() -> Self {
        Self::new()
    }
}

impl BattleContext {
    pub fn new() -> Self {
        Self {
            units: Vec::new(),
            squads: [Squad::new(BattleSide::Attacker), Squad::new(BattleSide::Defender)],
            turn_queue: UnitTurnQueue::new(),
            round: 0,
            is_second_attack: false,
        }
    }

    /// Places a fresh unit of `unit_type` into a squad.
    pub fn add_unit(&mut self, unit_type: Arc<UnitType>, side: BattleSide, position: SquadPosition) -> UnitId {
        let id = self.next_unit_id();
        self.units.push(Unit::new(id, unit_type, side, position));
        self.squads[side.index()].push(id);
        id
    }

    fn next_unit_id(&self) -> UnitId {
        UnitId(self.units.len() as u32)
    }

    /// Adds a unit to the arena without placing it in a squad.
    pub(crate) fn spawn(&mut self, unit_type: Arc<UnitType>, side: BattleSide, position: SquadPosition) -> UnitId {
        let id = self.next_unit_id();
        self.units.push(Unit::new(id, unit_type, side, position));
        id
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn unit(&self, id: UnitId) -> BattleResult<&Unit> {
        self.units
            .get(id.index())
            .ok_or_else(|| BattleError::unit_not_found(id, self.round))
    }

    pub fn unit_mut(&mut self, id: UnitId) -> BattleResult<&mut Unit> {
        let round = self.round;
        self.units
            .get_mut(id.index())
            .ok_or_else(|| BattleError::unit_not_found(id, round))
    }

    /// Every unit ever created in this battle, including replaced ones.
    pub fn all_units(&self) -> impl Iterator<Item = &Unit> {
        self.units.iter()
    }

    pub(crate) fn all_units_mut(&mut self) -> impl Iterator<Item = &mut Unit> {
        self.units.iter_mut()
    }

    pub fn squad(&self, side: BattleSide) -> &Squad {
        &self.squads[side.index()]
    }

    pub(crate) fn squad_mut(&mut self, side: BattleSide) -> &mut Squad {
        &mut self.squads[side.index()]
    }

    /// Units currently occupying squad slots, dead ones included.
    pub fn squad_units(&self, side: BattleSide) -> impl Iterator<Item = &Unit> {
        self.squad(side)
            .units()
            .iter()
            .filter_map(|id| self.units.get(id.index()))
    }

    pub fn active_units(&self, side: BattleSide) -> impl Iterator<Item = &Unit> {
        self.squad_units(side).filter(|unit| unit.is_active())
    }

    /// Unit holding `position` in the squad of `side`, if any.
    pub fn unit_at(&self, side: BattleSide, position: SquadPosition) -> Option<&Unit> {
        self.squad_units(side).find(|unit| unit.position == position)
    }

    pub fn is_unit_active(&self, id: UnitId) -> bool {
        self.units.get(id.index()).is_some_and(Unit::is_active)
    }

    /// Unit now holding the slot `id` was swapped out of by a transformation
    /// or its revert.
    pub fn replacement_of(&self, id: UnitId) -> Option<UnitId> {
        let unit = self.unit(id).ok().filter(|unit| unit.is_replaced())?;
        self.unit_at(unit.side, unit.position)
            .filter(|other| other.id != id && other.is_active())
            .map(|other| other.id)
    }

    pub fn current_unit(&self) -> Option<UnitId> {
        self.turn_queue.current_unit()
    }

    /// Advances to the next round and returns its first actor.
    pub fn start_round(&mut self, rng: &mut dyn BattleRng, env: &BattleEnv<'_>) -> Option<UnitId> {
        self.round += 1;
        self.is_second_attack = false;
        let squads = &self.squads;
        let units = &self.units;
        let in_squads = squads
            .iter()
            .flat_map(|squad| squad.units().iter())
            .filter_map(|id| units.get(id.index()));
        let order = initiative_order(in_squads, rng, env.config.initiative_variance);
        self.turn_queue
            .next_round(order, |id| units.get(id.index()).is_some_and(Unit::is_active))
    }

    /// Next actor of the current round, `None` once the round is exhausted.
    pub fn next_unit(&mut self) -> Option<UnitId> {
        self.is_second_attack = false;
        let units = &self.units;
        self.turn_queue
            .next_unit(|id| units.get(id.index()).is_some_and(Unit::is_active))
    }

    /// Swaps `old` for `new` in its squad slot and turn queue entries. `old`
    /// stays in the arena flagged as replaced.
    pub(crate) fn swap_in(&mut self, old: UnitId, new: UnitId) -> BattleResult<()> {
        let side = self.unit(old)?.side;
        let initiative = self.unit(new)?.effective_initiative();
        if !self.squad_mut(side).replace(old, new) {
            self.squad_mut(side).push(new);
        }
        self.unit_mut(old)?.status.insert(UnitStatus::REPLACED);
        self.unit_mut(new)?.status.remove(UnitStatus::REPLACED);
        self.turn_queue.reorder_transformed_unit_turn(old, new, initiative);
        Ok(())
    }

    /// Winner once one side has no unit left fighting.
    pub fn battle_outcome(&self) -> Option<BattleSide> {
        let attacker_alive = self.active_units(BattleSide::Attacker).next().is_some();
        let defender_alive = self.active_units(BattleSide::Defender).next().is_some();
        match (attacker_alive, defender_alive) {
            (true, false) => Some(BattleSide::Attacker),
            (false, true) => Some(BattleSide::Defender),
            _ => None,
        }
    }

    /// Effects controlled by `unit` that have not fired this round, as
    /// `(unit carrying the effect, attack type)` pairs.
    pub fn due_effects(&self, unit: UnitId) -> Vec<(UnitId, UnitAttackType)> {
        let round = self.round;
        let mut due = Vec::new();
        for carrier in self.units.iter().filter(|carrier| carrier.is_active()) {
            for effect in carrier.effects.iter() {
                let entry = (carrier.id, effect.attack_type);
                if effect.controlling_unit == unit && effect.is_due(round) && !due.contains(&entry) {
                    due.push(entry);
                }
            }
        }
        due
    }
}

/// Per-resolution view handed to attack processors.
#[derive(Clone, Copy, Debug)]
pub struct AttackProcessorContext<'a> {
    pub battle: &'a BattleContext,
    pub env: BattleEnv<'a>,
    pub attacker: UnitId,
    pub target: AttackTarget,
}

impl<'a> AttackProcessorContext<'a> {
    pub fn new(battle: &'a BattleContext, env: BattleEnv<'a>, attacker: UnitId, target: AttackTarget) -> Self {
        Self {
            battle,
            env,
            attacker,
            target,
        }
    }

    pub fn round(&self) -> u32 {
        self.battle.round()
    }

    pub fn attacker(&self) -> BattleResult<&'a Unit> {
        self.battle.unit(self.attacker)
    }

    /// Target unit; slot targets are rejected for `attack_type`.
    pub fn target_unit(&self, attack_type: UnitAttackType) -> BattleResult<&'a Unit> {
        match self.target {
            AttackTarget::Unit(id) => self.battle.unit(id),
            AttackTarget::Slot { .. } => Err(BattleError::unit_target_required(attack_type, self.round())),
        }
    }
}
