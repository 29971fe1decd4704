//! Begin / apply sequencing shared by all controllers.
//!
//! A processor is announced first, applied after the processor delay, then
//! followed by a short pause. Processors it spawns (deaths) wait for the
//! current wave to finish before they are announced.

use battle_core::{ProcessorOutcome, UnitActionProcessor};

use super::{ActionStep, ControllerContext};
use crate::error::ControllerResult;
use crate::events::BattleEvent;
use crate::host::BattleUnitAction;
use crate::scheduler::{ActionTrigger, BattleActionContainer};

/// Emits the "incoming" event. Dying units switch to their death animation.
pub(crate) fn begin_processor(
    ctx: &mut ControllerContext<'_>,
    processor: &UnitActionProcessor,
) -> ControllerResult<()> {
    let description = processor.describe();
    tracing::debug!(
        action = %description.action,
        target = ?description.target,
        attack_type = ?description.attack_type,
        power = ?description.power,
        "processor scheduled"
    );
    if let UnitActionProcessor::Death(death) = processor {
        ctx.play_unit_animation(death.unit, BattleUnitAction::Death)?;
    }
    ctx.events.push(BattleEvent::ProcessorBegin(description));
    Ok(())
}

/// Applies the processor and emits the "applied" event.
pub(crate) fn commit_processor(
    ctx: &mut ControllerContext<'_>,
    processor: &UnitActionProcessor,
) -> ControllerResult<ProcessorOutcome> {
    let outcome = processor.process(ctx.processor, ctx.battle, ctx.env)?;
    let description = processor.describe();
    match processor {
        UnitActionProcessor::Death(death) => {
            tracing::info!(unit = %death.unit, round = ctx.battle.round(), "unit died");
        }
        UnitActionProcessor::Retreated(retreat) => {
            tracing::info!(unit = %retreat.unit, round = ctx.battle.round(), "unit left the battle");
        }
        _ => tracing::debug!(action = %description.action, target = ?description.target, "processor applied"),
    }
    ctx.events.push(BattleEvent::ProcessorCompleted(description));
    Ok(outcome)
}

/// Announces `processor` now and applies it after the processor delay.
pub(crate) fn add_processor_action(
    ctx: &mut ControllerContext<'_>,
    container: &mut BattleActionContainer<ActionStep>,
    processor: UnitActionProcessor,
) -> ControllerResult<()> {
    begin_processor(ctx, &processor)?;
    container.add(
        ActionTrigger::timer(ctx.env.config.timings.processor_delay),
        ActionStep::ApplyProcessor(processor),
    );
    Ok(())
}

/// Applies a processor whose delay elapsed, then pauses. Follow-ups start
/// once the current wave is over.
pub(crate) fn complete_processor_action(
    ctx: &mut ControllerContext<'_>,
    container: &mut BattleActionContainer<ActionStep>,
    processor: &UnitActionProcessor,
) -> ControllerResult<ProcessorOutcome> {
    let mut outcome = commit_processor(ctx, processor)?;
    container.add(
        ActionTrigger::timer(ctx.env.config.timings.after_processor_delay),
        ActionStep::AfterProcessor,
    );
    for follow_up in std::mem::take(&mut outcome.follow_ups) {
        container.add_delayed(ActionTrigger::Event, ActionStep::BeginProcessor(follow_up));
    }
    Ok(outcome)
}

/// Handles the processor steps of a completed action. Returns the outcome
/// when a processor was applied.
pub(crate) fn handle_processor_step(
    ctx: &mut ControllerContext<'_>,
    container: &mut BattleActionContainer<ActionStep>,
    step: ActionStep,
) -> ControllerResult<Option<ProcessorOutcome>> {
    match step {
        ActionStep::BeginProcessor(processor) => {
            add_processor_action(ctx, container, processor)?;
            Ok(None)
        }
        ActionStep::ApplyProcessor(processor) => complete_processor_action(ctx, container, &processor).map(Some),
        _ => Ok(None),
    }
}
