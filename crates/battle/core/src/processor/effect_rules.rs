//! Duration, ownership and replacement rules for lasting effects.

use crate::config::{BattleConfig, InfiniteDurationPolicy};
use crate::context::BattleContext;
use crate::error::BattleResult;
use crate::model::{
    EffectDuration, Unit, UnitAttack, UnitAttackSource, UnitAttackType, UnitBattleEffect, UnitId,
    UnitProtection,
};
use crate::rng::BattleRng;

/// Base duration in turns, `None` for effects that last until removed.
fn base_turns(attack_type: UnitAttackType, config: &BattleConfig) -> Option<u32> {
    use UnitAttackType::*;
    match attack_type {
        Poison | Frostbite | Blister => Some(config.damage_over_time_duration),
        Summon | Doppelganger | TransformSelf => None,
        _ => Some(1),
    }
}

/// Whether the infinite variant rolls a turn count instead of never ending.
fn rolls_when_infinite(attack_type: UnitAttackType) -> bool {
    attack_type.is_damage_over_time()
        || attack_type.skips_turn()
        || attack_type == UnitAttackType::TransformEnemy
}

/// Duration of a freshly applied effect.
pub(crate) fn roll_duration(attack: &UnitAttack, config: &BattleConfig, rng: &mut dyn BattleRng) -> EffectDuration {
    let Some(turns) = base_turns(attack.attack_type, config) else {
        return EffectDuration::Infinite;
    };
    if !attack.is_infinite || attack.attack_type == UnitAttackType::Fear {
        return EffectDuration::turns(turns);
    }
    if !rolls_when_infinite(attack.attack_type) {
        return EffectDuration::Infinite;
    }
    let turns = match config.infinite_duration_policy {
        InfiniteDurationPolicy::Random => rng.range(config.min_infinite_duration, config.max_infinite_duration),
        InfiniteDurationPolicy::Maximum => config.max_infinite_duration,
    };
    EffectDuration::turns(turns)
}

/// Longest duration `attack` can produce; used to test replaceability before rolling.
pub(crate) fn longest_duration(attack: &UnitAttack, config: &BattleConfig) -> EffectDuration {
    let maximum = BattleConfig {
        infinite_duration_policy: InfiniteDurationPolicy::Maximum,
        ..config.clone()
    };
    roll_duration(attack, &maximum, &mut NoRolls)
}

struct NoRolls;

impl BattleRng for NoRolls {
    fn next_u32(&mut self) -> u32 {
        0
    }
}

/// Unit whose turns count the effect down: the target for hostile effects,
/// the caster for everything else.
pub(crate) fn controlling_unit(attack_type: UnitAttackType, attacker: UnitId, target: UnitId) -> UnitId {
    if attack_type.is_enemy_only() { target } else { attacker }
}

/// True when `target` holds no effect of this type or the incoming one wins
/// under the replacement policy.
pub(crate) fn can_apply(target: &Unit, attack: &UnitAttack, power: Option<u32>, config: &BattleConfig) -> bool {
    target
        .effects
        .get(attack.attack_type)
        .is_none_or(|existing| existing.can_be_replaced_by(power, &longest_duration(attack, config)))
}

/// True when `target` already holds an effect of this type that an incoming
/// one with `power` and the rolled `duration` would not replace. Protection
/// grants stack and are never superseded.
pub(crate) fn is_superseded(
    target: &Unit,
    attack_type: UnitAttackType,
    power: Option<u32>,
    duration: &EffectDuration,
) -> bool {
    attack_type != UnitAttackType::GiveProtection
        && target
            .effects
            .get(attack_type)
            .is_some_and(|existing| !existing.can_be_replaced_by(power, duration))
}

/// New effect description, before it is attached to a carrier.
pub(crate) struct EffectGrant {
    pub attack_type: UnitAttackType,
    pub source: UnitAttackSource,
    pub duration: EffectDuration,
    pub power: Option<u32>,
    pub protections: Vec<UnitProtection>,
    pub linked_unit: Option<UnitId>,
}

impl EffectGrant {
    pub fn new(attack_type: UnitAttackType, source: UnitAttackSource, duration: EffectDuration) -> Self {
        Self {
            attack_type,
            source,
            duration,
            power: None,
            protections: Vec::new(),
            linked_unit: None,
        }
    }

    /// Builds the effect. If the caster controls it, it counts as already
    /// triggered this round so it does not tick on the turn it was cast.
    pub fn into_effect(self, controlling_unit: UnitId, caster: UnitId, round: u32) -> UnitBattleEffect {
        let mut effect = UnitBattleEffect::new(self.attack_type, self.source, self.duration, controlling_unit)
            .with_protections(self.protections);
        effect.power = self.power;
        effect.linked_unit = self.linked_unit;
        if controlling_unit == caster {
            effect = effect.triggered_in(round);
        }
        effect
    }
}

/// Attaches `grant` to `carrier`, cast by `caster`. Returns false, leaving
/// the carrier untouched, when its current effect outlasts the rolled one.
pub(crate) fn attach_effect(
    battle: &mut BattleContext,
    caster: UnitId,
    carrier: UnitId,
    grant: EffectGrant,
) -> BattleResult<bool> {
    let round = battle.round();
    let unit = battle.unit_mut(carrier)?;
    if is_superseded(unit, grant.attack_type, grant.power, &grant.duration) {
        return Ok(false);
    }
    let controlling = controlling_unit(grant.attack_type, caster, carrier);
    unit.effects.insert(grant.into_effect(controlling, caster, round));
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UnitAttackReach;
    use crate::rng::ScriptedRng;

    fn attack(attack_type: UnitAttackType) -> UnitAttack {
        UnitAttack::new(attack_type, UnitAttackSource::Death, UnitAttackReach::Any)
    }

    #[test]
    fn regular_durations() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRng::constant(0);
        assert_eq!(
            roll_duration(&attack(UnitAttackType::Poison), &config, &mut rng),
            EffectDuration::turns(2)
        );
        assert_eq!(
            roll_duration(&attack(UnitAttackType::Paralyze), &config, &mut rng),
            EffectDuration::turns(1)
        );
        assert_eq!(
            roll_duration(&attack(UnitAttackType::TransformSelf), &config, &mut rng),
            EffectDuration::Infinite
        );
    }

    #[test]
    fn infinite_variants_roll_or_never_end() {
        let config = BattleConfig::default();
        let mut rng = ScriptedRng::new([1]);
        assert_eq!(
            roll_duration(&attack(UnitAttackType::Frostbite).infinite(), &config, &mut rng),
            EffectDuration::turns(3)
        );
        assert_eq!(
            roll_duration(&attack(UnitAttackType::IncreaseDamage).infinite(), &config, &mut rng),
            EffectDuration::Infinite
        );
        assert_eq!(
            roll_duration(&attack(UnitAttackType::Fear).infinite(), &config, &mut rng),
            EffectDuration::turns(1)
        );
        assert_eq!(
            longest_duration(&attack(UnitAttackType::Petrify).infinite(), &config),
            EffectDuration::turns(4)
        );
    }

    #[test]
    fn caster_controlled_effects_skip_the_casting_round() {
        let grant = EffectGrant::new(UnitAttackType::IncreaseDamage, UnitAttackSource::Life, EffectDuration::turns(1));
        let effect = grant.into_effect(UnitId(1), UnitId(1), 4);
        assert!(!effect.is_due(4));
        assert!(effect.is_due(5));

        let grant = EffectGrant::new(UnitAttackType::Poison, UnitAttackSource::Death, EffectDuration::turns(2));
        let effect = grant.into_effect(UnitId(2), UnitId(1), 4);
        assert!(effect.is_due(4));
    }
}
