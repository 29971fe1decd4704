use std::sync::Arc;

use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttack, UnitAttackType, UnitId, UnitType};
use crate::rng::BattleRng;

use super::effect_rules::{self, EffectGrant};
use super::{
    AppliedAttack, AppliedEffect, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult,
    CalculatedEffectResult, TargetCategory, lifecycle,
};

/// Scales `hit_points` from a pool of `from_max` to one of `to_max`.
/// Zero stays zero; anything alive keeps at least one point.
pub fn rescale_hit_points(hit_points: u32, from_max: u32, to_max: u32) -> u32 {
    if hit_points == 0 || from_max == 0 {
        return 0;
    }
    let scaled = u64::from(hit_points) * u64::from(to_max) / u64::from(from_max);
    (scaled as u32).clamp(1, to_max.max(1))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TransformKind {
    /// The attacker turns into its configured unit type.
    TransformSelf,
    /// The attacker copies the target's unit type.
    Doppelganger,
    /// The target turns into the configured unit type for a few turns.
    TransformEnemy,
}

#[derive(Clone, Copy, Debug)]
pub struct TransformProcessor {
    kind: TransformKind,
}

impl TransformProcessor {
    pub fn new(kind: TransformKind) -> Self {
        Self { kind }
    }

    fn configured_type(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> BattleResult<Arc<UnitType>> {
        let id = attack
            .transform_unit_type
            .as_ref()
            .ok_or_else(|| BattleError::missing_transform_type(attack.attack_type, ctx.round()))?;
        ctx.env
            .unit_types
            .unit_type(id)
            .ok_or_else(|| BattleError::unknown_unit_type(id.clone(), ctx.round()))
    }
}

impl AttackTypeProcessor for TransformProcessor {
    fn target_category(&self) -> TargetCategory {
        match self.kind {
            TransformKind::TransformSelf => TargetCategory::OwnSelf,
            TransformKind::Doppelganger => TargetCategory::AnyOther,
            TransformKind::TransformEnemy => TargetCategory::Enemy,
        }
    }

    fn can_main_attack_be_skipped(&self) -> bool {
        self.kind == TransformKind::TransformEnemy
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        if !self.target_category().accepts(ctx, attack.reach) {
            return false;
        }
        let (Ok(attacker), Ok(target)) = (ctx.attacker(), ctx.target_unit(attack.attack_type)) else {
            return false;
        };
        match self.kind {
            TransformKind::TransformSelf | TransformKind::Doppelganger => !attacker.effects.has(attack.attack_type),
            TransformKind::TransformEnemy => {
                let already_that_type = attack
                    .transform_unit_type
                    .as_ref()
                    .is_some_and(|id| *id == target.unit_type.id);
                !already_that_type && effect_rules::can_apply(target, attack, None, ctx.env.config)
            }
        }
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        let unit_type = match self.kind {
            TransformKind::Doppelganger => Arc::clone(&ctx.target_unit(attack.attack_type)?.unit_type),
            TransformKind::TransformSelf | TransformKind::TransformEnemy => self.configured_type(ctx, attack)?,
        };
        let duration = effect_rules::roll_duration(attack, ctx.env.config, rng);
        Ok(CalculatedAttackResult::new(
            ctx,
            attack,
            AttackOutcome::Transform { unit_type, duration },
        ))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        _env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        let AttackOutcome::Transform { unit_type, duration } = &result.outcome else {
            return Ok(AppliedAttack::default());
        };
        let subject = match self.kind {
            TransformKind::TransformSelf | TransformKind::Doppelganger => result.attacker,
            TransformKind::TransformEnemy => result
                .target
                .unit()
                .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?,
        };
        if effect_rules::is_superseded(battle.unit(subject)?, result.attack_type, None, duration) {
            return Ok(AppliedAttack::default());
        }
        let transformed = transform(battle, subject, Arc::clone(unit_type))?;

        let mut grant = EffectGrant::new(result.attack_type, result.source, *duration);
        grant.linked_unit = Some(subject);
        let caster = if subject == result.attacker { transformed } else { result.attacker };
        effect_rules::attach_effect(battle, caster, transformed, grant)?;
        Ok(AppliedAttack::spawned(transformed))
    }

    fn calculate_effect(&self, battle: &BattleContext, unit: UnitId) -> BattleResult<CalculatedEffectResult> {
        super::modifier::tick_result(battle, unit, self.attack_type())
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
        match self.kind {
            TransformKind::TransformSelf => UnitAttackType::TransformSelf,
            TransformKind::Doppelganger => UnitAttackType::Doppelganger,
            TransformKind::TransformEnemy => UnitAttackType::TransformEnemy,
        }
    }
}

/// Spawns a unit of `unit_type` in the slot of `subject` and swaps it in.
/// The new unit keeps the hit point ratio and the place in the turn order.
fn transform(battle: &mut BattleContext, subject: UnitId, unit_type: Arc<UnitType>) -> BattleResult<UnitId> {
    let (side, position, hit_points, max_hit_points) = {
        let unit = battle.unit(subject)?;
        (unit.side, unit.position, unit.hit_points(), unit.max_hit_points())
    };
    let new_max = unit_type.hit_points;
    let transformed = battle.spawn(unit_type, side, position);
    battle
        .unit_mut(transformed)?
        .set_hit_points(rescale_hit_points(hit_points, max_hit_points, new_max));
    battle.swap_in(subject, transformed)?;
    Ok(transformed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rescale_keeps_ratio_and_floor_of_one() {
        assert_eq!(rescale_hit_points(50, 100, 200), 100);
        assert_eq!(rescale_hit_points(1, 100, 50), 1);
        assert_eq!(rescale_hit_points(0, 100, 50), 0);
        assert_eq!(rescale_hit_points(100, 100, 80), 80);
    }
}
