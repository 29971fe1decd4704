//! Battle processor: resolves a unit's attack into per-target results and
//! commits them.
//!
//! Resolution and application are separate calls. The runtime resolves an
//! attack at the impact frame, shows each result, then applies it after the
//! processor delay.

mod action;
mod unit_processors;

pub use action::{ProcessorDescription, ProcessorOutcome, UnitActionProcessor, UnitActionType};
pub use unit_processors::{UnitDeathProcessor, UnitRetreatedProcessor, UnitRetreatingProcessor};

use crate::context::{AttackProcessorContext, AttackTarget, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{
    BattleSide, ProtectionCategory, SquadPosition, Unit, UnitAttack, UnitAttackReach, UnitAttackType, UnitId,
};
use crate::processor::{
    AppliedAttack, AppliedEffect, AttackOutcome, AttackProcessors, AttackTypeProcessor,
    CalculatedAttackResult, CalculatedEffectResult,
};
use crate::rng::BattleRng;

/// Results of one attack wave.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttackResolution {
    pub attacker: UnitId,
    /// Type of the attack the unit chose (main or alternative).
    pub attack_type: UnitAttackType,
    pub results: Vec<CalculatedAttackResult>,
    /// The unit gets another attack this turn.
    pub attacks_again: bool,
}

#[derive(Clone, Debug, Default)]
pub struct BattleProcessor {
    processors: AttackProcessors,
}

impl BattleProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn processors(&self) -> &AttackProcessors {
        &self.processors
    }

    /// The unit's main attack, or its alternative when requested and defined.
    pub fn main_attack(unit: &Unit, use_alternative: bool) -> &UnitAttack {
        let main = &unit.unit_type.main_attack;
        match main.alternative.as_deref() {
            Some(alternative) if use_alternative => alternative,
            _ => main,
        }
    }

    /// Attack `unit` would use against the context target: the main attack
    /// if it applies, else the secondary when the main one may be skipped.
    fn attack_for_target<'u>(
        &self,
        ctx: &AttackProcessorContext<'_>,
        unit: &'u Unit,
        use_alternative: bool,
    ) -> Option<&'u UnitAttack> {
        let main = Self::main_attack(unit, use_alternative);
        let main_processor = self.processors.get(main.attack_type);
        if main_processor.can_attack(ctx, main) {
            return Some(main);
        }
        if !main_processor.can_main_attack_be_skipped() {
            return None;
        }
        unit.unit_type
            .secondary_attack
            .as_ref()
            .filter(|secondary| self.processors.get(secondary.attack_type).can_attack(ctx, secondary))
    }

    /// Every unit in both squads plus every slot of the attacker's squad.
    fn candidate_targets(battle: &BattleContext, attacker: &Unit) -> Vec<AttackTarget> {
        let units = [BattleSide::Attacker, BattleSide::Defender]
            .into_iter()
            .flat_map(|side| battle.squad(side).units().iter().copied())
            .map(AttackTarget::Unit);
        let slots = SquadPosition::all().map(|position| AttackTarget::Slot {
            side: attacker.side,
            position,
        });
        units.chain(slots).collect()
    }

    fn target_side(battle: &BattleContext, target: AttackTarget) -> Option<BattleSide> {
        match target {
            AttackTarget::Unit(id) => battle.unit(id).ok().map(|unit| unit.side),
            AttackTarget::Slot { side, .. } => Some(side),
        }
    }

    /// Every target the unit may pick for its main (or alternative) attack.
    pub fn attack_targets(
        &self,
        battle: &BattleContext,
        env: BattleEnv<'_>,
        attacker: UnitId,
        use_alternative: bool,
    ) -> BattleResult<Vec<AttackTarget>> {
        let unit = battle.unit(attacker)?;
        Ok(Self::candidate_targets(battle, unit)
            .into_iter()
            .filter(|target| {
                let ctx = AttackProcessorContext::new(battle, env, attacker, *target);
                self.attack_for_target(&ctx, unit, use_alternative).is_some()
            })
            .collect())
    }

    /// True when `attacker` has at least one legal target.
    pub fn can_act(&self, battle: &BattleContext, env: BattleEnv<'_>, attacker: UnitId) -> bool {
        self.attack_targets(battle, env, attacker, false)
            .is_ok_and(|targets| !targets.is_empty())
    }

    /// Resolves the acting unit's attack against `target`, expanding area
    /// attacks to every valid target on that side.
    pub fn process_main_attack(
        &self,
        battle: &BattleContext,
        env: BattleEnv<'_>,
        rng: &mut dyn BattleRng,
        attacker: UnitId,
        target: AttackTarget,
        use_alternative: bool,
    ) -> BattleResult<AttackResolution> {
        let unit = battle.unit(attacker)?;
        let main = Self::main_attack(unit, use_alternative);
        let ctx = AttackProcessorContext::new(battle, env, attacker, target);
        if self.attack_for_target(&ctx, unit, use_alternative).is_none() {
            let id = target.unit().unwrap_or(attacker);
            return Err(BattleError::invalid_target(id, main.attack_type, battle.round()));
        }

        let targets = if main.reach == UnitAttackReach::All {
            let side = Self::target_side(battle, target);
            Self::candidate_targets(battle, unit)
                .into_iter()
                .filter(|candidate| Self::target_side(battle, *candidate) == side)
                .filter(|candidate| candidate.unit().is_some() == target.unit().is_some())
                .collect()
        } else {
            vec![target]
        };

        let mut results = Vec::with_capacity(targets.len());
        for target in targets {
            let ctx = AttackProcessorContext::new(battle, env, attacker, target);
            if let Some(attack) = self.attack_for_target(&ctx, unit, use_alternative) {
                results.push(self.calculate(&ctx, attack, rng)?);
            }
        }

        Ok(AttackResolution {
            attacker,
            attack_type: main.attack_type,
            results,
            attacks_again: unit.unit_type.attacks_twice && !battle.is_second_attack,
        })
    }

    /// Units eligible for the secondary pass: hit by the main attack and
    /// still fighting. Empty unless the attacker has a distinct secondary attack.
    pub fn secondary_targets(&self, battle: &BattleContext, resolution: &AttackResolution) -> Vec<UnitId> {
        let has_secondary = battle
            .unit(resolution.attacker)
            .is_ok_and(|unit| unit.unit_type.has_distinct_secondary_attack());
        if !has_secondary {
            return Vec::new();
        }
        resolution
            .results
            .iter()
            .filter(|result| result.attack_type == resolution.attack_type && result.outcome.is_hit())
            .filter_map(|result| result.target.unit())
            .filter(|id| battle.is_unit_active(*id))
            .collect()
    }

    /// Resolves the secondary attack against the units returned by
    /// [`Self::secondary_targets`].
    pub fn process_secondary_attack(
        &self,
        battle: &BattleContext,
        env: BattleEnv<'_>,
        rng: &mut dyn BattleRng,
        attacker: UnitId,
        targets: &[UnitId],
    ) -> BattleResult<Vec<CalculatedAttackResult>> {
        let unit = battle.unit(attacker)?;
        let Some(secondary) = unit.unit_type.secondary_attack.as_ref() else {
            return Ok(Vec::new());
        };
        let processor = self.processors.get(secondary.attack_type);
        let mut results = Vec::new();
        for &target in targets {
            let ctx = AttackProcessorContext::new(battle, env, attacker, target.into());
            if processor.can_attack(&ctx, secondary) {
                results.push(self.calculate(&ctx, secondary, rng)?);
            }
        }
        Ok(results)
    }

    /// Protection and accuracy checks for hostile attacks, then the type's
    /// own calculation.
    fn calculate(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        if attack.attack_type.is_enemy_only() {
            let target = ctx.target_unit(attack.attack_type)?;
            if let Some(protection) = target.find_protection(attack) {
                let outcome = match protection.category {
                    ProtectionCategory::Immunity => AttackOutcome::Immunity,
                    ProtectionCategory::Ward => AttackOutcome::Ward(protection),
                };
                return Ok(CalculatedAttackResult::new(ctx, attack, outcome));
            }
            if rng.roll_percent() >= attack.accuracy {
                return Ok(CalculatedAttackResult::new(ctx, attack, AttackOutcome::Miss));
            }
        }
        self.processors
            .get(attack.attack_type)
            .calculate_attack_result(ctx, attack, rng)
    }

    /// Commits a resolved result. Wards are consumed here.
    pub fn apply_attack(
        &self,
        battle: &mut BattleContext,
        env: BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        match &result.outcome {
            AttackOutcome::Miss | AttackOutcome::Immunity => Ok(AppliedAttack::default()),
            AttackOutcome::Ward(protection) => {
                if let Some(target) = result.target.unit() {
                    battle.unit_mut(target)?.consume_ward(protection);
                }
                Ok(AppliedAttack::default())
            }
            _ => self
                .processors
                .get(result.attack_type)
                .process_attack(battle, &env, result),
        }
    }

    pub fn calculate_effect(
        &self,
        battle: &BattleContext,
        carrier: UnitId,
        attack_type: UnitAttackType,
    ) -> BattleResult<CalculatedEffectResult> {
        self.processors.get(attack_type).calculate_effect(battle, carrier)
    }

    pub fn apply_effect(
        &self,
        battle: &mut BattleContext,
        result: &CalculatedEffectResult,
    ) -> BattleResult<AppliedEffect> {
        self.processors.get(result.attack_type).process_effect(battle, result)
    }
}
