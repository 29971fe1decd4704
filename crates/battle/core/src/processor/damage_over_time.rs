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

/// Poison, frostbite and blister: a lasting effect that deals its power in
/// damage on each of the victim's turns.
#[derive(Clone, Copy, Debug)]
pub struct DamageOverTimeProcessor {
    attack_type: UnitAttackType,
}

impl DamageOverTimeProcessor {
    pub fn new(attack_type: UnitAttackType) -> Self {
        debug_assert!(attack_type.is_damage_over_time());
        Self { attack_type }
    }
}

impl AttackTypeProcessor for DamageOverTimeProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::Enemy
    }

    fn can_main_attack_be_skipped(&self) -> bool {
        true
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
        let carrier = battle.unit(unit)?;
        let effect = carrier
            .effects
            .get(self.attack_type)
            .filter(|effect| effect.is_due(battle.round()))
            .ok_or_else(|| BattleError::cannot_process_effect(unit, self.attack_type, battle.round()))?;
        let damage = effect.power.unwrap_or(0).min(carrier.hit_points());
        Ok(CalculatedEffectResult {
            unit,
            attack_type: self.attack_type,
            round: battle.round(),
            outcome: EffectOutcome::Damage { damage },
        })
    }

    fn process_effect(
        &self,
        battle: &mut BattleContext,
        result: &CalculatedEffectResult,
    ) -> BattleResult<AppliedEffect> {
        let fired = lifecycle::tick_effect(battle, result.unit, result.attack_type)?;
        let damage = match result.outcome {
            EffectOutcome::Damage { damage } => damage,
            _ => 0,
        };
        let unit = battle.unit_mut(result.unit)?;
        unit.take_damage(damage);
        Ok(AppliedEffect {
            killed: unit.is_dead().then_some(result.unit),
            skip_turn: false,
            completed: fired.duration.is_completed(),
        })
    }

    fn attack_type(&self) -> UnitAttackType {
        self.attack_type
    }
}
