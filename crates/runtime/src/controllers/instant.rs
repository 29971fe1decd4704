use battle_core::{BattleError, UnitActionProcessor, UnitId, UnitRetreatingProcessor};

use super::sequencer::{begin_processor, commit_processor};
use super::{ActionStep, BattleUnitActionController, ControllerContext};
use crate::error::ControllerResult;
use crate::scheduler::{ActionTrigger, BattleActionContainer};

/// Turn spent without attacking.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InstantAction {
    /// Halve incoming damage until the unit's next turn.
    Defend,
    /// Act again after every other unit this round.
    Wait,
    /// Leave the battle at the start of the next turn.
    Retreat,
}

/// Applies a single processor after the instant action delay.
#[derive(Debug)]
pub struct InstantActionController {
    unit: UnitId,
    action: InstantAction,
    container: BattleActionContainer<ActionStep>,
    is_completed: bool,
}

impl InstantActionController {
    pub fn new(unit: UnitId, action: InstantAction) -> Self {
        Self {
            unit,
            action,
            container: BattleActionContainer::new(),
            is_completed: false,
        }
    }

    pub fn action(&self) -> InstantAction {
        self.action
    }

    fn processor(&self, ctx: &ControllerContext<'_>) -> ControllerResult<UnitActionProcessor> {
        Ok(match self.action {
            InstantAction::Defend => UnitActionProcessor::Defend(self.unit),
            InstantAction::Wait => {
                if !ctx.battle.turn_queue.can_wait(self.unit) {
                    return Err(BattleError::cannot_wait(self.unit, ctx.battle.round()).into());
                }
                UnitActionProcessor::Wait(self.unit)
            }
            InstantAction::Retreat => UnitActionProcessor::Retreating(UnitRetreatingProcessor::new(self.unit)),
        })
    }
}

impl BattleUnitActionController for InstantActionController {
    fn is_completed(&self) -> bool {
        self.is_completed
    }

    fn should_pass_turn(&self) -> bool {
        false
    }

    fn initialize(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        ctx.battle.unit(self.unit)?;
        let processor = self.processor(ctx)?;
        tracing::debug!(unit = %self.unit, action = ?self.action, "instant action");
        begin_processor(ctx, &processor)?;
        self.container.add(
            ActionTrigger::timer(ctx.env.config.timings.instant_action_delay),
            ActionStep::ApplyProcessor(processor),
        );
        Ok(())
    }

    fn before_scene_update(&mut self, ctx: &mut ControllerContext<'_>, ticks: u64) -> ControllerResult<()> {
        self.container.before_scene_update(ticks, &*ctx.host);
        for action in self.container.take_completed() {
            if let ActionStep::ApplyProcessor(processor) = action.payload {
                commit_processor(ctx, &processor)?;
            }
        }
        if self.container.is_empty() {
            self.is_completed = true;
        }
        Ok(())
    }

    fn after_scene_update(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        self.container.after_scene_update();
        Ok(())
    }
}
