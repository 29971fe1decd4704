use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{ProtectionTarget, UnitAttack, UnitAttackType, UnitId, UnitProtection};
use crate::rng::BattleRng;

use super::effect_rules::{self, EffectGrant};
use super::{
    AppliedAttack, AppliedEffect, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult,
    CalculatedEffectResult, TargetCategory, lifecycle, modifier,
};

/// Grants an ally single-use wards against the attack's `ward_sources`.
/// Grants from several casts stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProtectionProcessor;

impl AttackTypeProcessor for ProtectionProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::Ally
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        !attack.ward_sources.is_empty() && self.target_category().accepts(ctx, attack.reach)
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        let protections = attack
            .ward_sources
            .iter()
            .map(|source| UnitProtection::ward(ProtectionTarget::Source(*source)))
            .collect();
        Ok(CalculatedAttackResult::new(
            ctx,
            attack,
            AttackOutcome::Effect {
                duration: effect_rules::roll_duration(attack, ctx.env.config, rng),
                power: None,
                protections,
            },
        ))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        _env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        let AttackOutcome::Effect {
            duration,
            protections,
            ..
        } = &result.outcome
        else {
            return Ok(AppliedAttack::default());
        };
        let target = result
            .target
            .unit()
            .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?;
        let mut grant = EffectGrant::new(result.attack_type, result.source, *duration);
        grant.protections = protections.clone();
        effect_rules::attach_effect(battle, result.attacker, target, grant)?;
        Ok(AppliedAttack::default())
    }

    fn calculate_effect(&self, battle: &BattleContext, unit: UnitId) -> BattleResult<CalculatedEffectResult> {
        modifier::tick_result(battle, unit, UnitAttackType::GiveProtection)
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
        UnitAttackType::GiveProtection
    }
}
