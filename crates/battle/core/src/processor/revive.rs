use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttack, UnitAttackType, UnitStatus};
use crate::rng::BattleRng;

use super::{AppliedAttack, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult, TargetCategory};

/// Brings a fallen ally back with a share of its hit points. A unit can be
/// revived once per battle; summoned units cannot.
#[derive(Clone, Copy, Debug, Default)]
pub struct ReviveProcessor;

impl AttackTypeProcessor for ReviveProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::DeadAlly
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        self.target_category().accepts(ctx, attack.reach)
            && ctx
                .target_unit(attack.attack_type)
                .is_ok_and(|target| !target.status.intersects(UnitStatus::REVIVED | UnitStatus::SUMMONED))
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        _rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        let target = ctx.target_unit(attack.attack_type)?;
        let hit_points = (target.max_hit_points() * ctx.env.config.revive_hit_points_percent / 100).max(1);
        Ok(CalculatedAttackResult::new(ctx, attack, AttackOutcome::Revive { hit_points }))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        _env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        if let AttackOutcome::Revive { hit_points } = result.outcome {
            let target = result
                .target
                .unit()
                .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?;
            battle.unit_mut(target)?.revive(hit_points);
        }
        Ok(AppliedAttack::default())
    }

    fn attack_type(&self) -> UnitAttackType {
        UnitAttackType::Revive
    }
}
