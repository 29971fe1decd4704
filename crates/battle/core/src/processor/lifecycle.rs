//! Effect expiry and the clean-up it triggers.
//!
//! Most effects simply disappear when they run out. Transformations restore
//! the original unit and summons vacate their slot, so every removal path
//! (natural expiry, cure, death, retreat) goes through [`finish_effect`].

use crate::context::BattleContext;
use crate::error::{BattleError, BattleResult};
use crate::model::{UnitAttackType, UnitBattleEffect, UnitId, UnitStatus};

use super::transform::rescale_hit_points;

/// Fires every due `attack_type` effect on `carrier` for the current round.
/// Returns the first one as it was after firing. Expired effects are removed
/// and finished before returning.
pub(crate) fn tick_effect(
    battle: &mut BattleContext,
    carrier: UnitId,
    attack_type: UnitAttackType,
) -> BattleResult<UnitBattleEffect> {
    let round = battle.round();
    let unit = battle.unit_mut(carrier)?;
    let mut fired = None;
    for effect in unit.effects.iter_mut().filter(|e| e.attack_type == attack_type) {
        if effect.trigger(round) && fired.is_none() {
            fired = Some(effect.clone());
        }
    }
    let fired = fired.ok_or_else(|| BattleError::cannot_process_effect(carrier, attack_type, round))?;
    let expired = unit
        .effects
        .drain_where(|e| e.attack_type == attack_type && e.duration.is_completed());
    for effect in expired {
        finish_effect(battle, carrier, effect)?;
    }
    Ok(fired)
}

/// Force-completes and removes the effects of `carrier` matching `predicate`,
/// running their clean-up. Returns the removed attack types.
pub(crate) fn complete_effects(
    battle: &mut BattleContext,
    carrier: UnitId,
    predicate: impl Fn(&UnitBattleEffect) -> bool,
) -> BattleResult<Vec<UnitAttackType>> {
    let removed = battle.unit_mut(carrier)?.effects.drain_where(|effect| predicate(effect));
    let mut types = Vec::with_capacity(removed.len());
    for mut effect in removed {
        effect.force_complete();
        types.push(effect.attack_type);
        finish_effect(battle, carrier, effect)?;
    }
    Ok(types)
}

/// Clean-up for an effect that just left `carrier`.
pub(crate) fn finish_effect(battle: &mut BattleContext, carrier: UnitId, effect: UnitBattleEffect) -> BattleResult<()> {
    match effect.attack_type {
        UnitAttackType::TransformSelf | UnitAttackType::TransformEnemy | UnitAttackType::Doppelganger => {
            if let Some(original) = effect.linked_unit {
                revert_transformation(battle, carrier, original)?;
            }
        }
        UnitAttackType::Summon => unsummon(battle, carrier, effect.linked_unit)?,
        _ => {}
    }
    Ok(())
}

/// Puts `original` back in the slot of `transformed`.
///
/// Hit points keep the transformed unit's ratio; a living unit keeps at least
/// one. Death, retreat and experience carry over.
pub(crate) fn revert_transformation(
    battle: &mut BattleContext,
    transformed: UnitId,
    original: UnitId,
) -> BattleResult<()> {
    let (hit_points, max_hit_points, carried_status, experience) = {
        let unit = battle.unit(transformed)?;
        let carried = unit.status & (UnitStatus::RETREATING | UnitStatus::RETREATED | UnitStatus::REVIVED);
        (unit.hit_points(), unit.max_hit_points(), carried, unit.experience)
    };
    {
        let unit = battle.unit_mut(original)?;
        let restored = rescale_hit_points(hit_points, max_hit_points, unit.max_hit_points());
        unit.set_hit_points(restored);
        unit.status.insert(carried_status);
        unit.experience += experience;
    }
    battle.swap_in(transformed, original)
}

/// Removes a summoned unit, restoring the fallen unit it was placed over.
pub(crate) fn unsummon(battle: &mut BattleContext, summoned: UnitId, displaced: Option<UnitId>) -> BattleResult<()> {
    let side = battle.unit(summoned)?.side;
    match displaced {
        Some(displaced) => {
            battle.swap_in(summoned, displaced)?;
        }
        None => {
            battle.squad_mut(side).remove(summoned);
            battle.unit_mut(summoned)?.status.insert(UnitStatus::REPLACED);
        }
    }
    let leftovers = battle.unit_mut(summoned)?.effects.drain_where(|_| true);
    for effect in leftovers {
        finish_effect(battle, summoned, effect)?;
    }
    Ok(())
}

/// Releases everything `unit` held when it leaves the battle: its own
/// effects end, its summons vanish and effects it counted down pass to the
/// units carrying them.
pub(crate) fn release_unit(battle: &mut BattleContext, unit: UnitId) -> BattleResult<()> {
    complete_effects(battle, unit, |_| true)?;

    let summons: Vec<UnitId> = battle
        .all_units()
        .filter(|carrier| carrier.id != unit && !carrier.is_replaced())
        .filter(|carrier| {
            carrier
                .effects
                .get(UnitAttackType::Summon)
                .is_some_and(|effect| effect.controlling_unit == unit)
        })
        .map(|carrier| carrier.id)
        .collect();
    for summoned in summons {
        complete_effects(battle, summoned, |effect| effect.attack_type == UnitAttackType::Summon)?;
    }

    for carrier in battle.all_units_mut() {
        let carrier_id = carrier.id;
        for effect in carrier.effects.iter_mut() {
            if effect.controlling_unit == unit {
                effect.controlling_unit = carrier_id;
            }
        }
    }
    Ok(())
}
