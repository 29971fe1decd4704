use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttack, UnitAttackType};
use crate::rng::BattleRng;

use super::{AppliedAttack, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult, TargetCategory, lifecycle};

/// Ends every hostile lasting effect on an ally. A cured enemy
/// transformation reverts the ally to its original form.
#[derive(Clone, Copy, Debug, Default)]
pub struct CureProcessor;

impl AttackTypeProcessor for CureProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::Ally
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        self.target_category().accepts(ctx, attack.reach)
            && ctx
                .target_unit(attack.attack_type)
                .is_ok_and(|target| target.effects.iter().any(|e| e.attack_type.is_curable()))
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        _rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        let effects = ctx
            .target_unit(attack.attack_type)?
            .effects
            .iter()
            .map(|e| e.attack_type)
            .filter(|t| t.is_curable())
            .collect();
        Ok(CalculatedAttackResult::new(ctx, attack, AttackOutcome::Cure { effects }))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        _env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        let AttackOutcome::Cure { effects } = &result.outcome else {
            return Ok(AppliedAttack::default());
        };
        let target = result
            .target
            .unit()
            .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?;
        lifecycle::complete_effects(battle, target, |e| effects.contains(&e.attack_type))?;
        Ok(AppliedAttack::default())
    }

    fn attack_type(&self) -> UnitAttackType {
        UnitAttackType::Cure
    }
}
