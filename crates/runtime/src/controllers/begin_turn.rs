use std::collections::VecDeque;

use battle_core::{
    UnitActionProcessor, UnitAttackType, UnitId, UnitRetreatedProcessor, UnitStatus,
};

use super::sequencer::{add_processor_action, handle_processor_step};
use super::{ActionStep, BattleUnitActionController, ControllerContext};
use crate::error::ControllerResult;
use crate::scheduler::BattleActionContainer;

/// Runs the start of a unit's turn: drops its defend stance, fires every
/// effect it controls that is due this round, then lets it leave if it is
/// retreating.
///
/// Effects fire one after another; each waits for the previous one (and any
/// death it caused) to finish.
#[derive(Debug)]
pub struct BeginUnitTurnController {
    unit: UnitId,
    container: BattleActionContainer<ActionStep>,
    pending: VecDeque<(UnitId, UnitAttackType)>,
    retreat_checked: bool,
    should_pass_turn: bool,
    is_completed: bool,
}

impl BeginUnitTurnController {
    pub fn new(unit: UnitId) -> Self {
        Self {
            unit,
            container: BattleActionContainer::new(),
            pending: VecDeque::new(),
            retreat_checked: false,
            should_pass_turn: false,
            is_completed: false,
        }
    }

    /// Unit whose turn this is. Follows the slot when a transformation on
    /// the acting unit is reverted.
    pub fn unit(&self) -> UnitId {
        self.unit
    }

    fn retreat(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        tracing::info!(unit = %self.unit, round = ctx.battle.round(), "unit retreats");
        self.should_pass_turn = true;
        add_processor_action(
            ctx,
            &mut self.container,
            UnitActionProcessor::Retreated(UnitRetreatedProcessor::new(self.unit)),
        )
    }

    /// Schedules the next piece of work once the container drained.
    fn advance(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        while self.container.is_empty() {
            if !ctx.battle.is_unit_active(self.unit) {
                // a reverted transformation hands the turn to the restored unit
                if let Some(restored) = ctx.battle.replacement_of(self.unit) {
                    tracing::debug!(unit = %self.unit, %restored, "unit swapped, turn continues");
                    self.unit = restored;
                    self.pending = ctx.battle.due_effects(restored).into();
                    continue;
                }
                self.pending.clear();
                self.retreat_checked = true;
                self.should_pass_turn = true;
            }

            if let Some((carrier, attack_type)) = self.pending.pop_front() {
                // an earlier effect may have ended this one
                if !ctx.battle.due_effects(self.unit).contains(&(carrier, attack_type)) {
                    tracing::debug!(unit = %self.unit, %carrier, %attack_type, "effect no longer due");
                    continue;
                }
                let result = ctx.processor.calculate_effect(ctx.battle, carrier, attack_type)?;
                add_processor_action(ctx, &mut self.container, UnitActionProcessor::Effect(result))?;
                continue;
            }

            if !self.retreat_checked {
                self.retreat_checked = true;
                if ctx.battle.unit(self.unit)?.is_retreating() {
                    self.retreat(ctx)?;
                }
                continue;
            }

            tracing::debug!(unit = %self.unit, pass = self.should_pass_turn, "turn start finished");
            self.is_completed = true;
            break;
        }
        Ok(())
    }
}

impl BattleUnitActionController for BeginUnitTurnController {
    fn is_completed(&self) -> bool {
        self.is_completed
    }

    fn should_pass_turn(&self) -> bool {
        self.should_pass_turn
    }

    fn initialize(&mut self, ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        let unit = ctx.battle.unit_mut(self.unit)?;
        unit.status.remove(UnitStatus::DEFENDING);
        let retreating = unit.is_retreating();
        tracing::debug!(unit = %self.unit, round = ctx.battle.round(), "turn begins");

        if retreating {
            // retreat ordered on an earlier turn: leave before anything fires
            self.retreat_checked = true;
            self.retreat(ctx)?;
            return Ok(());
        }

        self.pending = ctx.battle.due_effects(self.unit).into();
        self.advance(ctx)
    }

    fn before_scene_update(&mut self, ctx: &mut ControllerContext<'_>, ticks: u64) -> ControllerResult<()> {
        self.container.before_scene_update(ticks, &*ctx.host);
        for action in self.container.take_completed() {
            if let Some(outcome) = handle_processor_step(ctx, &mut self.container, action.payload)? {
                self.should_pass_turn |= outcome.skip_turn;
            }
        }
        if !self.is_completed {
            self.advance(ctx)?;
        }
        Ok(())
    }

    fn after_scene_update(&mut self, _ctx: &mut ControllerContext<'_>) -> ControllerResult<()> {
        self.container.after_scene_update();
        Ok(())
    }
}
