use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttack, UnitAttackType, UnitId};
use crate::rng::BattleRng;

use super::effect_rules::{self, EffectGrant};
use super::{
    AppliedAttack, AppliedEffect, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult,
    CalculatedEffectResult, EffectOutcome, TargetCategory, lifecycle,
};

/// Percent modifiers to damage, initiative or armor. Reductions hit enemies,
/// the damage boost goes to allies.
#[derive(Clone, Copy, Debug)]
pub struct ModifierProcessor {
    attack_type: UnitAttackType,
}

impl ModifierProcessor {
    pub fn new(attack_type: UnitAttackType) -> Self {
        Self { attack_type }
    }
}

impl AttackTypeProcessor for ModifierProcessor {
    fn target_category(&self) -> TargetCategory {
        if self.attack_type.is_enemy_only() {
            TargetCategory::Enemy
        } else {
            TargetCategory::Ally
        }
    }

    fn can_main_attack_be_skipped(&self) -> bool {
        self.attack_type.is_enemy_only()
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        self.target_category().accepts(ctx, attack.reach)
            && ctx
                .target_unit(attack.attack_type)
                .is_ok_and(|target| effect_rules::can_apply(target, attack, Some(attack.power), ctx.env.config))
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
                power: Some(attack.power),
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
        let AttackOutcome::Effect { duration, power, .. } = &result.outcome else {
            return Ok(AppliedAttack::default());
        };
        let target = result
            .target
            .unit()
            .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?;
        let mut grant = EffectGrant::new(result.attack_type, result.source, *duration);
        grant.power = *power;
        effect_rules::attach_effect(battle, result.attacker, target, grant)?;
        Ok(AppliedAttack::default())
    }

    fn calculate_effect(&self, battle: &BattleContext, unit: UnitId) -> BattleResult<CalculatedEffectResult> {
        tick_result(battle, unit, self.attack_type)
    }

    fn process_effect(
        &self,
        battle: &mut BattleContext,
        result: &CalculatedEffectResult,
    ) -> BattleResult<AppliedEffect> {
        let fired = lifecycle::tick_effect(battle, result.unit, result.attack_type)?;
        Ok(AppliedEffect {
            completed: fired.duration.is_completed(),
            ..AppliedEffect::default()
        })
    }

    fn attack_type(&self) -> UnitAttackType {
        self.attack_type
    }
}

/// Effect result for effects whose only per-turn action is counting down.
pub(super) fn tick_result(
    battle: &BattleContext,
    unit: UnitId,
    attack_type: UnitAttackType,
) -> BattleResult<CalculatedEffectResult> {
    let due = battle
        .unit(unit)?
        .effects
        .iter()
        .any(|effect| effect.attack_type == attack_type && effect.is_due(battle.round()));
    if !due {
        return Err(BattleError::cannot_process_effect(unit, attack_type, battle.round()));
    }
    Ok(CalculatedEffectResult {
        unit,
        attack_type,
        round: battle.round(),
        outcome: EffectOutcome::Tick,
    })
}
