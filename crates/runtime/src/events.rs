//! Outbound portrait feedback.
//!
//! Controllers push an event when a processor is scheduled ("incoming") and
//! again once it is applied. The UI drains the queue once per tick; nothing
//! flows back into the battle.

use std::collections::VecDeque;

use battle_core::{ProcessorDescription, UnitId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleEvent {
    /// A processor was scheduled; battle state is not changed yet.
    ProcessorBegin(ProcessorDescription),
    /// The processor was applied.
    ProcessorCompleted(ProcessorDescription),
}

impl BattleEvent {
    pub fn description(&self) -> &ProcessorDescription {
        match self {
            Self::ProcessorBegin(description) | Self::ProcessorCompleted(description) => description,
        }
    }

    /// Portrait the event is shown on.
    pub fn target(&self) -> Option<UnitId> {
        self.description().target
    }

    pub fn is_begin(&self) -> bool {
        matches!(self, Self::ProcessorBegin(_))
    }
}

#[derive(Clone, Debug, Default)]
pub struct BattleEventQueue {
    events: VecDeque<BattleEvent>,
}

impl BattleEventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push_back(event);
    }

    /// Removes and returns every pending event in emission order.
    pub fn drain(&mut self) -> impl Iterator<Item = BattleEvent> + '_ {
        self.events.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
