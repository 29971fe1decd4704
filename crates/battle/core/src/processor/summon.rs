use crate::context::{AttackProcessorContext, AttackTarget, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{EffectDuration, UnitAttack, UnitAttackType, UnitBattleEffect, UnitStatus};
use crate::rng::BattleRng;

use super::{AppliedAttack, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult, TargetCategory};

/// Places a new unit in a free (or fallen) slot of the summoner's squad.
/// The summon lasts until the summoner dies or leaves the battle.
#[derive(Clone, Copy, Debug, Default)]
pub struct SummonProcessor;

impl AttackTypeProcessor for SummonProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::EmptySlot
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        attack.transform_unit_type.is_some() && self.target_category().accepts(ctx, attack.reach)
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        _rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        if !matches!(ctx.target, AttackTarget::Slot { .. }) {
            return Err(BattleError::slot_target_required(attack.attack_type, ctx.round()));
        }
        let id = attack
            .transform_unit_type
            .as_ref()
            .ok_or_else(|| BattleError::missing_transform_type(attack.attack_type, ctx.round()))?;
        let unit_type = ctx
            .env
            .unit_types
            .unit_type(id)
            .ok_or_else(|| BattleError::unknown_unit_type(id.clone(), ctx.round()))?;
        Ok(CalculatedAttackResult::new(ctx, attack, AttackOutcome::Summon { unit_type }))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        _env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        let AttackOutcome::Summon { unit_type } = &result.outcome else {
            return Ok(AppliedAttack::default());
        };
        let AttackTarget::Slot { side, position } = result.target else {
            return Err(BattleError::slot_target_required(result.attack_type, battle.round()));
        };

        let displaced = battle.unit_at(side, position).map(|unit| unit.id);
        let summoned = battle.spawn(unit_type.clone(), side, position);
        match displaced {
            Some(fallen) => battle.swap_in(fallen, summoned)?,
            None => battle.squad_mut(side).push(summoned),
        }

        let mut effect = UnitBattleEffect::new(
            UnitAttackType::Summon,
            result.source,
            EffectDuration::Infinite,
            result.attacker,
        );
        effect.linked_unit = displaced;
        let unit = battle.unit_mut(summoned)?;
        unit.status.insert(UnitStatus::SUMMONED);
        unit.effects.insert(effect);
        Ok(AppliedAttack::spawned(summoned))
    }

    fn attack_type(&self) -> UnitAttackType {
        UnitAttackType::Summon
    }
}
