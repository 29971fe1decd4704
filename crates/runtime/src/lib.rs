//! Tick-driven presentation of battle turns.
//!
//! `battle-core` decides what happens; this crate decides when. Each phase of
//! a unit's turn is a controller that schedules its steps in a
//! [`BattleActionContainer`], gating them on timers or on animation progress
//! reported by the host, and applies core processors as their delays elapse.
//!
//! Modules are organized by responsibility:
//! - [`scheduler`] hosts the action container
//! - [`controllers`] drive one turn phase each
//! - [`host`] declares the animation, asset and sound collaborators
//! - [`events`] carries portrait feedback out to the UI
pub mod controllers;
pub mod error;
pub mod events;
pub mod host;
pub mod scheduler;

pub use controllers::{
    BattleUnitActionController, BeginUnitTurnController, ControllerContext, InstantAction,
    InstantActionController, MainAttackController,
};
pub use error::{ControllerError, ControllerResult};
pub use events::{BattleEvent, BattleEventQueue};
pub use host::{
    AnimationAnchor, AnimationClip, AnimationHandle, AnimationHost, AnimationProgress, BattleDirection,
    BattleResourceProvider, BattleUnitAction, SoundClip, SoundController, SoundHandle,
};
pub use scheduler::{ActionId, ActionTrigger, BattleAction, BattleActionContainer};
