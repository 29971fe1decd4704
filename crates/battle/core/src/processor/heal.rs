use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttack, UnitAttackType};
use crate::rng::BattleRng;

use super::{AppliedAttack, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult, TargetCategory};

/// Restores `power` hit points to a wounded ally.
#[derive(Clone, Copy, Debug, Default)]
pub struct HealProcessor;

impl AttackTypeProcessor for HealProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::Ally
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        self.target_category().accepts(ctx, attack.reach)
            && ctx
                .target_unit(attack.attack_type)
                .is_ok_and(|target| target.missing_hit_points() > 0)
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        _rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        let target = ctx.target_unit(attack.attack_type)?;
        let hit_points = attack.power.min(target.missing_hit_points());
        Ok(CalculatedAttackResult::new(ctx, attack, AttackOutcome::Heal { hit_points }))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        _env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        if let AttackOutcome::Heal { hit_points } = result.outcome {
            let target = result
                .target
                .unit()
                .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?;
            battle.unit_mut(target)?.heal(hit_points);
        }
        Ok(AppliedAttack::default())
    }

    fn attack_type(&self) -> UnitAttackType {
        UnitAttackType::Heal
    }
}
