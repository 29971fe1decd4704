//! Unit turn ordering within a round.
//!
//! A round starts from a list ordered by initiative. Units are popped in that
//! order (FIFO); a unit may postpone its turn, which pushes it onto a waiting
//! stack that is drained (LIFO) once the main order is exhausted.

use std::collections::VecDeque;

use crate::model::{Unit, UnitId};
use crate::rng::BattleRng;

/// A unit's slot in the round order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct QueuedTurn {
    pub unit: UnitId,
    pub initiative: u32,
}

impl QueuedTurn {
    pub const fn new(unit: UnitId, initiative: u32) -> Self {
        Self { unit, initiative }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UnitTurnQueue {
    turn_order: VecDeque<QueuedTurn>,
    waiting: Vec<QueuedTurn>,
    current: Option<QueuedTurn>,
    is_waiting_turn: bool,
}

impl UnitTurnQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resets the queue with a new round order and returns the first actor.
    pub fn next_round(
        &mut self,
        ordered: impl IntoIterator<Item = QueuedTurn>,
        is_active: impl Fn(UnitId) -> bool,
    ) -> Option<UnitId> {
        self.turn_order = ordered.into_iter().collect();
        self.waiting.clear();
        self.current = None;
        self.is_waiting_turn = false;
        self.next_unit(is_active)
    }

    /// Pops the next unit able to act. Inactive (dead, retreated, replaced)
    /// units are dropped. Returns `None` when the round is over.
    pub fn next_unit(&mut self, is_active: impl Fn(UnitId) -> bool) -> Option<UnitId> {
        while let Some(turn) = self.turn_order.pop_front() {
            if is_active(turn.unit) {
                self.current = Some(turn);
                self.is_waiting_turn = false;
                return Some(turn.unit);
            }
        }

        while let Some(turn) = self.waiting.pop() {
            if is_active(turn.unit) {
                self.current = Some(turn);
                self.is_waiting_turn = true;
                return Some(turn.unit);
            }
        }

        self.current = None;
        None
    }

    /// Postpones `unit` to the waiting stack. A unit already acting from the
    /// stack cannot wait again this round.
    pub fn unit_wait(&mut self, unit: UnitId) -> bool {
        if !self.can_wait(unit) {
            return false;
        }
        let initiative = self
            .current
            .filter(|turn| turn.unit == unit)
            .map_or(0, |turn| turn.initiative);
        self.waiting.push(QueuedTurn::new(unit, initiative));
        true
    }

    pub fn can_wait(&self, unit: UnitId) -> bool {
        !(self.is_waiting_turn && self.current_unit() == Some(unit))
            && !self.waiting.iter().any(|turn| turn.unit == unit)
    }

    /// Repoints every queued reference of `old` to `new` in place.
    pub fn reorder_transformed_unit_turn(&mut self, old: UnitId, new: UnitId, new_initiative: u32) {
        let repoint = |turn: &mut QueuedTurn| {
            if turn.unit == old {
                *turn = QueuedTurn::new(new, new_initiative);
            }
        };
        self.turn_order.iter_mut().for_each(repoint);
        self.waiting.iter_mut().for_each(repoint);
        if let Some(turn) = self.current.as_mut() {
            repoint(turn);
        }
    }

    pub fn current_unit(&self) -> Option<UnitId> {
        self.current.map(|turn| turn.unit)
    }

    /// True when the acting unit came from the waiting stack.
    pub fn is_waiting_turn(&self) -> bool {
        self.is_waiting_turn
    }

    /// Units still to act this round, in the order they will be asked.
    pub fn pending(&self) -> impl Iterator<Item = UnitId> + '_ {
        self.turn_order
            .iter()
            .chain(self.waiting.iter().rev())
            .map(|turn| turn.unit)
    }
}

/// Orders active units for a new round by effective initiative plus a random
/// bonus in `[0, variance]`. Ties go to the lower unit id.
pub fn initiative_order<'a>(
    units: impl IntoIterator<Item = &'a Unit>,
    rng: &mut dyn BattleRng,
    variance: u32,
) -> Vec<QueuedTurn> {
    let mut order: Vec<QueuedTurn> = units
        .into_iter()
        .filter(|unit| unit.is_active())
        .map(|unit| QueuedTurn::new(unit.id, unit.effective_initiative() + rng.range(0, variance)))
        .collect();
    order.sort_by(|a, b| b.initiative.cmp(&a.initiative).then(a.unit.cmp(&b.unit)));
    order
}
