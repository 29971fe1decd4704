use crate::config::BattleConfig;
use crate::context::{AttackProcessorContext, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{Unit, UnitAttack, UnitAttackType, UnitId};
use crate::rng::BattleRng;

use super::{AppliedAttack, AttackOutcome, AttackTypeProcessor, CalculatedAttackResult, TargetCategory};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DamageKind {
    Plain,
    /// Attacker recovers part of the damage dealt.
    DrainLife,
    /// As `DrainLife`; healing the attacker cannot use is shared among wounded allies.
    DrainLifeOverflow,
}

#[derive(Clone, Copy, Debug)]
pub struct DamageProcessor {
    kind: DamageKind,
}

impl DamageProcessor {
    pub fn new(kind: DamageKind) -> Self {
        Self { kind }
    }
}

/// Regular and critical damage `attacker` deals to `target` given a random bonus.
///
/// Regular damage is `(base + bonus)` reduced by armor, halved against a
/// defending target. Critical damage is a share of base power that ignores
/// armor. Neither can take more than the target's remaining hit points.
pub fn compute_damage(
    attacker: &Unit,
    target: &Unit,
    attack: &UnitAttack,
    bonus: u32,
    config: &BattleConfig,
) -> (u32, u32) {
    let base = attack.power * attacker.damage_modifier_percent() / 100;
    let armor = target.effective_armor(config.max_armor).min(100);
    let mut damage = (base + bonus) * (100 - armor) / 100;
    if target.is_defending() {
        damage /= 2;
    }
    let damage = damage.min(target.hit_points());

    let critical = if attack.is_critical {
        (base * config.critical_damage_percent / 100).min(target.hit_points() - damage)
    } else {
        0
    };
    (damage, critical)
}

impl AttackTypeProcessor for DamageProcessor {
    fn target_category(&self) -> TargetCategory {
        TargetCategory::Enemy
    }

    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool {
        self.target_category().accepts(ctx, attack.reach)
    }

    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult> {
        let attacker = ctx.attacker()?;
        let target = ctx.target_unit(attack.attack_type)?;
        let bonus = rng.range(0, ctx.env.config.damage_random_bonus);
        let (damage, critical_damage) = compute_damage(attacker, target, attack, bonus, ctx.env.config);
        Ok(CalculatedAttackResult::new(
            ctx,
            attack,
            AttackOutcome::Damage {
                damage,
                critical_damage,
            },
        ))
    }

    fn process_attack(
        &self,
        battle: &mut BattleContext,
        env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack> {
        let AttackOutcome::Damage {
            damage,
            critical_damage,
        } = result.outcome
        else {
            return Ok(AppliedAttack::default());
        };
        let target_id = result
            .target
            .unit()
            .ok_or_else(|| BattleError::unit_target_required(result.attack_type, battle.round()))?;

        let target = battle.unit_mut(target_id)?;
        let dealt = target.take_damage(damage + critical_damage);
        let killed = target.is_dead();

        if self.kind != DamageKind::Plain {
            let drained = dealt * env.config.drain_life_percent / 100;
            let healed = battle.unit_mut(result.attacker)?.heal(drained);
            if self.kind == DamageKind::DrainLifeOverflow {
                share_overflow(battle, result.attacker, drained - healed)?;
            }
        }

        Ok(if killed {
            AppliedAttack::killed(target_id)
        } else {
            AppliedAttack::default()
        })
    }

    fn attack_type(&self) -> UnitAttackType {
        match self.kind {
            DamageKind::Plain => UnitAttackType::Damage,
            DamageKind::DrainLife => UnitAttackType::DrainLife,
            DamageKind::DrainLifeOverflow => UnitAttackType::DrainLifeOverflow,
        }
    }
}

/// Splits `amount` evenly among wounded living allies of `attacker`. The
/// remainder goes one point at a time in squad order.
fn share_overflow(battle: &mut BattleContext, attacker: UnitId, amount: u32) -> BattleResult<()> {
    if amount == 0 {
        return Ok(());
    }
    let side = battle.unit(attacker)?.side;
    let wounded: Vec<UnitId> = battle
        .active_units(side)
        .filter(|unit| unit.id != attacker && unit.missing_hit_points() > 0)
        .map(|unit| unit.id)
        .collect();
    if wounded.is_empty() {
        return Ok(());
    }

    let count = wounded.len() as u32;
    let share = amount / count;
    let remainder = amount % count;
    for (index, id) in wounded.into_iter().enumerate() {
        let extra = u32::from((index as u32) < remainder);
        battle.unit_mut(id)?.heal(share + extra);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{UnitAttackReach, UnitAttackSource, UnitStatus, UnitType};
    use crate::model::{BattleSide, SquadPosition};

    fn unit(hit_points: u32, armor: u32) -> Unit {
        let attack = UnitAttack::new(UnitAttackType::Damage, UnitAttackSource::Weapon, UnitAttackReach::Adjacent)
            .with_power(20);
        let unit_type = UnitType::new("unit", hit_points, attack).with_armor(armor);
        Unit::new(UnitId(0), Arc::new(unit_type), BattleSide::Attacker, SquadPosition::front(0))
    }

    #[test]
    fn armor_scales_base_and_bonus() {
        let config = BattleConfig::default();
        let attacker = unit(100, 0);
        let target = unit(100, 50);
        let attack = attacker.unit_type.main_attack.clone();

        assert_eq!(compute_damage(&attacker, &target, &attack, 0, &config), (10, 0));
        assert_eq!(compute_damage(&attacker, &target, &attack, 4, &config), (12, 0));
    }

    #[test]
    fn defending_halves_regular_damage() {
        let config = BattleConfig::default();
        let attacker = unit(100, 0);
        let mut target = unit(100, 0);
        target.status.insert(UnitStatus::DEFENDING);
        let attack = attacker.unit_type.main_attack.clone();

        assert_eq!(compute_damage(&attacker, &target, &attack, 0, &config), (10, 0));
    }

    #[test]
    fn critical_damage_ignores_armor_but_not_remaining_hit_points() {
        let config = BattleConfig::default();
        let attacker = unit(100, 0);
        let attack = attacker.unit_type.main_attack.clone().with_power(100).critical();

        let sturdy = unit(500, 50);
        assert_eq!(compute_damage(&attacker, &sturdy, &attack, 0, &config), (50, 5));

        let frail = unit(52, 50);
        assert_eq!(compute_damage(&attacker, &frail, &attack, 0, &config), (50, 2));
    }
}
