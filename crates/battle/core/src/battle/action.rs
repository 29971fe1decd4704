use crate::context::BattleContext;
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttackType, UnitId, UnitStatus};
use crate::processor::{AttackOutcome, CalculatedAttackResult, CalculatedEffectResult, EffectOutcome};

use super::{BattleProcessor, UnitDeathProcessor, UnitRetreatedProcessor, UnitRetreatingProcessor};

/// What a processor does to its target, as shown on the target portrait.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum UnitActionType {
    Attack,
    Miss,
    Ward,
    Immunity,
    /// A lasting effect fires on its carrier.
    Effect,
    Death,
    Retreating,
    Retreated,
    Defend,
    Wait,
}

/// Portrait-facing summary of a queued processor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProcessorDescription {
    pub target: Option<UnitId>,
    pub action: UnitActionType,
    pub attack_type: Option<UnitAttackType>,
    pub power: Option<u32>,
}

/// What applying a processor led to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProcessorOutcome {
    /// Processors to run after this one, e.g. deaths caused by a hit.
    pub follow_ups: Vec<UnitActionProcessor>,
    /// The acting unit loses the rest of its turn.
    pub skip_turn: bool,
}

/// One unit of work scheduled by a controller: computed up front, applied
/// after the processor delay.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitActionProcessor {
    Attack(CalculatedAttackResult),
    Effect(CalculatedEffectResult),
    Death(UnitDeathProcessor),
    Retreating(UnitRetreatingProcessor),
    Retreated(UnitRetreatedProcessor),
    Defend(UnitId),
    Wait(UnitId),
}

impl UnitActionProcessor {
    pub fn target_unit(&self) -> Option<UnitId> {
        match self {
            Self::Attack(result) => result.target.unit(),
            Self::Effect(result) => Some(result.unit),
            Self::Death(death) => Some(death.unit),
            Self::Retreating(retreat) => Some(retreat.unit),
            Self::Retreated(retreat) => Some(retreat.unit),
            Self::Defend(unit) | Self::Wait(unit) => Some(*unit),
        }
    }

    pub fn describe(&self) -> ProcessorDescription {
        let (action, attack_type, power) = match self {
            Self::Attack(result) => {
                let action = match result.outcome {
                    AttackOutcome::Miss => UnitActionType::Miss,
                    AttackOutcome::Ward(_) => UnitActionType::Ward,
                    AttackOutcome::Immunity => UnitActionType::Immunity,
                    _ => UnitActionType::Attack,
                };
                (action, Some(result.attack_type), result.outcome.power())
            }
            Self::Effect(result) => {
                let power = match result.outcome {
                    EffectOutcome::Damage { damage } => Some(damage),
                    _ => None,
                };
                (UnitActionType::Effect, Some(result.attack_type), power)
            }
            Self::Death(_) => (UnitActionType::Death, None, None),
            Self::Retreating(_) => (UnitActionType::Retreating, None, None),
            Self::Retreated(_) => (UnitActionType::Retreated, None, None),
            Self::Defend(_) => (UnitActionType::Defend, None, None),
            Self::Wait(_) => (UnitActionType::Wait, None, None),
        };
        ProcessorDescription {
            target: self.target_unit(),
            action,
            attack_type,
            power,
        }
    }

    /// Commits the processor. Deaths it causes are returned as follow-ups so
    /// the caller can present them in their own wave.
    pub fn process(
        &self,
        processor: &BattleProcessor,
        battle: &mut BattleContext,
        env: BattleEnv<'_>,
    ) -> BattleResult<ProcessorOutcome> {
        let mut outcome = ProcessorOutcome::default();
        match self {
            Self::Attack(result) => {
                let applied = processor.apply_attack(battle, env, result)?;
                for unit in applied.killed {
                    outcome
                        .follow_ups
                        .push(Self::Death(UnitDeathProcessor::new(battle, unit)?));
                }
            }
            Self::Effect(result) => {
                let applied = processor.apply_effect(battle, result)?;
                outcome.skip_turn = applied.skip_turn;
                if let Some(unit) = applied.killed {
                    outcome.skip_turn = true;
                    outcome
                        .follow_ups
                        .push(Self::Death(UnitDeathProcessor::new(battle, unit)?));
                }
            }
            Self::Death(death) => death.process(battle)?,
            Self::Retreating(retreat) => retreat.process(battle)?,
            Self::Retreated(retreat) => {
                retreat.process(battle)?;
                outcome.skip_turn = true;
            }
            Self::Defend(unit) => {
                battle.unit_mut(*unit)?.status.insert(UnitStatus::DEFENDING);
            }
            Self::Wait(unit) => {
                if !battle.turn_queue.unit_wait(*unit) {
                    return Err(BattleError::cannot_wait(*unit, battle.round()));
                }
            }
        }
        Ok(outcome)
    }
}
