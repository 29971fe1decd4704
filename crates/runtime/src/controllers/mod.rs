//! Unit action controllers.
//!
//! One controller drives one phase of a unit's turn: the effects that fire
//! when the turn begins, the main attack, or an instant action (defend, wait,
//! retreat). The scene calls [`BattleUnitActionController::initialize`] once,
//! then `before_scene_update` / `after_scene_update` every tick until
//! [`BattleUnitActionController::is_completed`] turns true.

mod attack;
mod begin_turn;
mod instant;
mod sequencer;

pub use attack::MainAttackController;
pub use begin_turn::BeginUnitTurnController;
pub use instant::{InstantAction, InstantActionController};

use battle_core::{BattleContext, BattleEnv, BattleProcessor, BattleRng, UnitActionProcessor, UnitId};

use crate::error::{ControllerError, ControllerResult};
use crate::events::BattleEventQueue;
use crate::host::{
    AnimationClip, AnimationHandle, AnimationHost, BattleDirection, BattleResourceProvider,
    BattleUnitAction, SoundController,
};

/// Everything a controller touches during one call. Built by the scene for
/// each call; controllers never keep it.
pub struct ControllerContext<'a> {
    pub battle: &'a mut BattleContext,
    pub env: BattleEnv<'a>,
    pub processor: &'a BattleProcessor,
    pub rng: &'a mut dyn BattleRng,
    pub host: &'a mut dyn AnimationHost,
    pub resources: &'a dyn BattleResourceProvider,
    pub sounds: &'a mut dyn SoundController,
    pub events: &'a mut BattleEventQueue,
}

impl ControllerContext<'_> {
    /// Animation `action` of `unit`, facing the way its side does.
    pub(crate) fn unit_animation(&self, unit: UnitId, action: BattleUnitAction) -> ControllerResult<AnimationClip> {
        let unit = self.battle.unit(unit)?;
        let direction = BattleDirection::of(unit.side);
        self.resources
            .unit_animation(&unit.unit_type.id, direction, action)
            .ok_or_else(|| ControllerError::MissingAnimation {
                unit_type: unit.unit_type.id.clone(),
                direction,
                action,
            })
    }

    /// Switches `unit` to its `action` animation.
    pub(crate) fn play_unit_animation(
        &mut self,
        unit: UnitId,
        action: BattleUnitAction,
    ) -> ControllerResult<(AnimationHandle, AnimationClip)> {
        let clip = self.unit_animation(unit, action)?;
        let handle = self.host.set_unit_animation(unit, &clip);
        Ok((handle, clip))
    }
}

pub trait BattleUnitActionController {
    fn is_completed(&self) -> bool;

    /// The unit loses the rest of its turn. Read once completed.
    fn should_pass_turn(&self) -> bool;

    fn initialize(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()>;

    fn before_scene_update(&mut self, ctx: &mut ControllerContext<'_>, ticks: u64) -> ControllerResult<()>;

    fn after_scene_update(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()>;
}

/// Payload of the actions controllers schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ActionStep {
    /// Announce a processor queued behind the current wave.
    BeginProcessor(UnitActionProcessor),
    /// Apply a processor whose delay elapsed.
    ApplyProcessor(UnitActionProcessor),
    /// Pause after a processor was applied.
    AfterProcessor,
    /// Attacker animation reached its sound cue.
    AttackSound,
    /// Attacker animation reached its impact frame.
    AttackImpact,
    /// Attacker animation finished.
    AttackEnd,
    /// Overlay animation finished and can be removed.
    Overlay(AnimationHandle),
}
