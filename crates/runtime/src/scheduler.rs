//! Tick-driven action container.
//!
//! A controller schedules its work as [`BattleAction`]s. Each action waits on
//! a [`ActionTrigger`] and moves through four buckets:
//!
//! ```text
//! add()          ──► New ──after_scene_update──► Active ──finished──► Completed
//! add_delayed()  ──► Delayed ──(Active empty)──► New
//! ```
//!
//! Completed actions are visible for exactly one update; the next
//! [`BattleActionContainer::before_scene_update`] clears them.

use std::mem;

use crate::host::{AnimationHandle, AnimationProgress};

/// Identifier of an action, unique within its container.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ActionId(pub u64);

/// What an active action is waiting for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionTrigger {
    /// Elapsed ticks since the action became active.
    Timer { duration: u64 },
    /// An animation reaching (or passing) a frame.
    AnimationFrame { animation: AnimationHandle, frame: usize },
    /// An animation playing to its end. Unknown or removed handles count
    /// as finished.
    AnimationEnd { animation: AnimationHandle },
    /// Finishes on the first update after it becomes active.
    Event,
}

impl ActionTrigger {
    pub const fn timer(duration: u64) -> Self {
        Self::Timer { duration }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleAction<P> {
    pub id: ActionId,
    pub trigger: ActionTrigger,
    pub payload: P,
    elapsed: u64,
}

impl<P> BattleAction<P> {
    /// Ticks spent in the active bucket so far.
    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    fn advance<A: AnimationProgress + ?Sized>(&mut self, ticks: u64, animations: &A) -> bool {
        match self.trigger {
            ActionTrigger::Timer { duration } => {
                self.elapsed = self.elapsed.saturating_add(ticks);
                self.elapsed >= duration
            }
            ActionTrigger::AnimationFrame { animation, frame } => {
                self.elapsed = self.elapsed.saturating_add(ticks);
                animations.is_animation_completed(animation)
                    || animations.frame_index(animation).is_none_or(|current| current >= frame)
            }
            ActionTrigger::AnimationEnd { animation } => {
                self.elapsed = self.elapsed.saturating_add(ticks);
                animations.is_animation_completed(animation) || animations.frame_index(animation).is_none()
            }
            ActionTrigger::Event => true,
        }
    }
}

#[derive(Clone, Debug)]
pub struct BattleActionContainer<P> {
    active: Vec<BattleAction<P>>,
    new: Vec<BattleAction<P>>,
    delayed: Vec<BattleAction<P>>,
    completed: Vec<BattleAction<P>>,
    next_id: u64,
    all_completed_this_update: bool,
    actions_begin_this_update: bool,
}

impl<P> Default for BattleActionContainer<P> {
    fn default() -> Self {
        Self {
            active: Vec::new(),
            new: Vec::new(),
            delayed: Vec::new(),
            completed: Vec::new(),
            next_id: 0,
            all_completed_this_update: false,
            actions_begin_this_update: false,
        }
    }
}

impl<P> BattleActionContainer<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an action that becomes active on the next
    /// [`Self::after_scene_update`].
    pub fn add(&mut self, trigger: ActionTrigger, payload: P) -> ActionId {
        let action = self.make_action(trigger, payload);
        let id = action.id;
        self.new.push(action);
        id
    }

    /// Schedules an action that waits until every active action finished.
    pub fn add_delayed(&mut self, trigger: ActionTrigger, payload: P) -> ActionId {
        let action = self.make_action(trigger, payload);
        let id = action.id;
        self.delayed.push(action);
        id
    }

    fn make_action(&mut self, trigger: ActionTrigger, payload: P) -> BattleAction<P> {
        let id = ActionId(self.next_id);
        self.next_id += 1;
        BattleAction {
            id,
            trigger,
            payload,
            elapsed: 0,
        }
    }

    /// Advances active actions by `ticks` and collects the finished ones.
    /// Delayed actions are promoted once nothing is active.
    pub fn before_scene_update<A: AnimationProgress + ?Sized>(&mut self, ticks: u64, animations: &A) {
        self.completed.clear();
        self.all_completed_this_update = false;
        self.actions_begin_this_update = false;

        let had_active = !self.active.is_empty();
        let mut index = 0;
        while index < self.active.len() {
            if self.active[index].advance(ticks, animations) {
                // keep scheduling order among completed actions
                self.completed.push(self.active.remove(index));
            } else {
                index += 1;
            }
        }

        if self.active.is_empty() && !self.delayed.is_empty() {
            tracing::trace!(count = self.delayed.len(), "promoting delayed actions");
            self.new.append(&mut self.delayed);
        }

        self.all_completed_this_update = had_active && self.is_idle();
    }

    /// Starts every action scheduled since the last update.
    pub fn after_scene_update(&mut self) {
        if self.new.is_empty() {
            return;
        }
        self.actions_begin_this_update = self.active.is_empty();
        self.active.append(&mut self.new);
    }

    pub fn active(&self) -> &[BattleAction<P>] {
        &self.active
    }

    pub fn new_actions(&self) -> &[BattleAction<P>] {
        &self.new
    }

    pub fn delayed(&self) -> &[BattleAction<P>] {
        &self.delayed
    }

    /// Actions that finished during the last [`Self::before_scene_update`].
    pub fn completed(&self) -> &[BattleAction<P>] {
        &self.completed
    }

    /// Hands the completed actions to the caller.
    pub fn take_completed(&mut self) -> Vec<BattleAction<P>> {
        mem::take(&mut self.completed)
    }

    /// No action is waiting to start or running.
    pub fn is_idle(&self) -> bool {
        self.active.is_empty() && self.new.is_empty() && self.delayed.is_empty()
    }

    /// Every bucket, completed included, is empty.
    pub fn is_empty(&self) -> bool {
        self.is_idle() && self.completed.is_empty()
    }

    /// The last running action finished during this update and nothing else
    /// is scheduled.
    pub fn is_all_actions_completed_this_update(&self) -> bool {
        self.all_completed_this_update
    }

    /// A wave of actions started from an idle active bucket during this update.
    pub fn is_actions_begin_this_update(&self) -> bool {
        self.actions_begin_this_update
    }
}
