use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttack, UnitAttackType, UnitId, UnitStatus};
use crate::rng::BattleRng;

use super::effect_rules::{self, EffectGrant};
use super::{
    AppliedAttack, AppliedEffect, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult,
    CalculatedEffectResult, EffectOutcome, TargetCategory, lifecycle,
};

/// Paralyze and petrify cost the victim its turns; fear makes it flee.
#[derive(Clone, Copy, Debug)]
pub struct ControlProcessor {
    attack_type: UnitAttackType,
}

impl ControlProcessor {
    pub fn new(attack_type: UnitAttackType) -> Self {
        debug_assert!(attack_type.skips_turn() || attack_type == UnitAttackType::Fear);
        Self { attack_type }
    }
}

impl AttackTypeProcessor for ControlProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::Enemy
    }

    fn can_main_attack_be_skipped(&self) -> bool {
        true
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        self.target_category().accepts(ctx, attack.reach)
            && ctx.target_unit(attack.attack_type).is_ok_and(|target| {
                !target.is_retreating() && effect_rules::can_apply(target, attack, None, ctx.env.config)
            })
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        let duration = effect_rules::roll_duration(attack, ctx.env.config, rng);
        Ok(CalculatedAttackResult::new(
            ctx,
            attack,
            AttackOutcome::Effect {
                duration,
                power: None,
                protections: Vec::new(),
            },
        ))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        _env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        let AttackOutcome::Effect { duration, .. } = &result.outcome else {
            return Ok(AppliedAttack::default());
        };
        let target = result
            .target
            .unit()
            .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?;
        let grant = EffectGrant::new(result.attack_type, result.source, *duration);
        effect_rules::attach_effect(battle, result.attacker, target, grant)?;
        Ok(AppliedAttack::default())
    }

    fn calculate_effect(&self, battle: &BattleContext, unit: UnitId) -> BattleResult<CalculatedEffectResult> {
        let due = battle
            .unit(unit)?
            .effects
            .get(self.attack_type)
            .is_some_and(|effect| effect.is_due(battle.round()));
        if !due {
            return Err(BattleError::cannot_process_effect(unit, self.attack_type, battle.round()));
        }
        let outcome = if self.attack_type == UnitAttackType::Fear {
            EffectOutcome::Retreat
        } else {
            EffectOutcome::SkipTurn
        };
        Ok(CalculatedEffectResult {
            unit,
            attack_type: self.attack_type,
            round: battle.round(),
            outcome,
        })
    }

    fn process_effect(
        &self,
        battle: &mut BattleContext,
        result: &CalculatedEffectResult,
    ) -> BattleResult<AppliedEffect> {
        let fired = lifecycle::tick_effect(battle, result.unit, result.attack_type)?;
        if result.outcome == EffectOutcome::Retreat {
            battle.unit_mut(result.unit)?.status.insert(UnitStatus::RETREATING);
        }
        Ok(AppliedEffect {
            killed: None,
            skip_turn: result.outcome == EffectOutcome::SkipTurn,
            completed: fired.duration.is_completed(),
        })
    }

    fn attack_type(&self) -> UnitAttackType {
        self.attack_type
    }
}
