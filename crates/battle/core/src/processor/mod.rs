//! Attack type processors.
//!
//! One strategy per attack-type family. Every processor splits its work in
//! two: a pure `calculate_*` step producing an immutable result, and a
//! `process_*` step committing that result to the [`BattleContext`]. The split
//! lets the presentation layer show the predicted outcome before the state
//! changes.
//!
//! [`AttackProcessors`] maps each [`UnitAttackType`] to its processor with an
//! exhaustive `match`, so adding an attack type without a processor does not
//! compile.

mod control;
mod cure;
mod damage;
mod damage_over_time;
mod effect_rules;
mod heal;
pub(crate) mod lifecycle;
mod modifier;
mod protection;
mod revive;
mod summon;
pub(crate) mod targeting;
mod transform;

use std::sync::Arc;

pub use control::ControlProcessor;
pub use cure::CureProcessor;
pub use damage::{DamageKind, DamageProcessor, compute_damage};
pub use damage_over_time::DamageOverTimeProcessor;
pub use heal::HealProcessor;
pub use modifier::ModifierProcessor;
pub use protection::ProtectionProcessor;
pub use revive::ReviveProcessor;
pub use summon::SummonProcessor;
pub use targeting::TargetCategory;
pub use transform::{TransformKind, TransformProcessor, rescale_hit_points};

use crate::context::{AttackProcessorContext, AttackTarget, BattleContext};
use crate::env::BattleEnv;
use crate::error::{BattleError, BattleResult};
use crate::model::{
    EffectDuration, UnitAttack, UnitAttackSource, UnitAttackType, UnitId, UnitProtection, UnitType,
};
use crate::rng::BattleRng;

/// Predicted outcome of one attack against one target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttackOutcome {
    Miss,
    /// Blocked by a single-use ward, consumed when the result is applied.
    Ward(UnitProtection),
    Immunity,
    Damage {
        damage: u32,
        critical_damage: u32,
    },
    Heal {
        hit_points: u32,
    },
    Effect {
        duration: EffectDuration,
        power: Option<u32>,
        protections: Vec<UnitProtection>,
    },
    Cure {
        effects: Vec<UnitAttackType>,
    },
    Revive {
        hit_points: u32,
    },
    Summon {
        unit_type: Arc<UnitType>,
    },
    Transform {
        unit_type: Arc<UnitType>,
        duration: EffectDuration,
    },
}

impl AttackOutcome {
    /// Anything but a miss or a block.
    pub fn is_hit(&self) -> bool {
        !matches!(self, Self::Miss | Self::Ward(_) | Self::Immunity)
    }

    /// Number shown on the target portrait.
    pub fn power(&self) -> Option<u32> {
        match self {
            Self::Damage {
                damage,
                critical_damage,
            } => Some(damage + critical_damage),
            Self::Heal { hit_points } | Self::Revive { hit_points } => Some(*hit_points),
            Self::Effect { power, .. } => *power,
            _ => None,
        }
    }
}

/// Immutable snapshot of what an attack will do, produced by the calculate
/// step and consumed by the process step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CalculatedAttackResult {
    pub attacker: UnitId,
    pub target: AttackTarget,
    pub attack_type: UnitAttackType,
    pub source: UnitAttackSource,
    pub outcome: AttackOutcome,
}

impl CalculatedAttackResult {
    pub fn new(ctx: &AttackProcessorContext<'_>, attack: &UnitAttack, outcome: AttackOutcome) -> Self {
        Self {
            attacker: ctx.attacker,
            target: ctx.target,
            attack_type: attack.attack_type,
            source: attack.source,
            outcome,
        }
    }
}

/// Units affected by committing an attack.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedAttack {
    /// Units that died from this application.
    pub killed: Vec<UnitId>,
    /// Units that entered a squad slot (summons, transformations).
    pub spawned: Vec<UnitId>,
}

impl AppliedAttack {
    pub fn killed(unit: UnitId) -> Self {
        Self {
            killed: vec![unit],
            spawned: Vec::new(),
        }
    }

    pub fn spawned(unit: UnitId) -> Self {
        Self {
            killed: Vec::new(),
            spawned: vec![unit],
        }
    }
}

/// What a recurring effect does when it fires on its controlling unit's turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectOutcome {
    Damage { damage: u32 },
    SkipTurn,
    Retreat,
    /// Only the duration advances.
    Tick,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CalculatedEffectResult {
    /// Unit carrying the effect.
    pub unit: UnitId,
    pub attack_type: UnitAttackType,
    pub round: u32,
    pub outcome: EffectOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppliedEffect {
    pub killed: Option<UnitId>,
    /// The carrier loses its turn.
    pub skip_turn: bool,
    /// The effect ran out and was removed.
    pub completed: bool,
}

/// Strategy shared by all attack-type families.
pub trait AttackTypeProcessor: Send + Sync {
    /// Which units (or slots) the attack may be aimed at.
    fn target_category(&self) -> TargetCategory;

    /// Whether a unit whose main attack cannot apply may go straight to its
    /// secondary attack.
    fn can_main_attack_be_skipped(&self) -> bool {
        false
    }

    /// Reachability, friend/enemy filter and effect-replacement check.
    fn can_attack(&self, ctx: &AttackProcessorContext<'_>, attack: &UnitAttack) -> bool;

    /// Computes the hit payload. Pure: `ctx` is read-only.
    fn calculate_attack_result(
        &self,
        ctx: &AttackProcessorContext<'_>,
        attack: &UnitAttack,
        rng: &mut dyn BattleRng,
    ) -> BattleResult<CalculatedAttackResult>;

    /// Commits a hit produced by [`Self::calculate_attack_result`].
    fn process_attack(
        &self,
        battle: &mut BattleContext,
        env: &BattleEnv<'_>,
        result: &CalculatedAttackResult,
    ) -> BattleResult<AppliedAttack>;

    /// Computes what the effect carried by `unit` does this round.
    fn calculate_effect(&self, battle: &BattleContext, unit: UnitId) -> BattleResult<CalculatedEffectResult> {
        let _ = unit;
        Err(BattleError::effect_not_supported(self.attack_type(), battle.round()))
    }

    fn process_effect(
        &self,
        battle: &mut BattleContext,
        result: &CalculatedEffectResult,
    ) -> BattleResult<AppliedEffect> {
        Err(BattleError::effect_not_supported(result.attack_type, battle.round()))
    }

    fn attack_type(&self) -> UnitAttackType;
}

/// Processor registry keyed by attack type.
#[derive(Clone, Debug)]
pub struct AttackProcessors {
    damage: DamageProcessor,
    drain_life: DamageProcessor,
    drain_life_overflow: DamageProcessor,
    heal: HealProcessor,
    cure: CureProcessor,
    revive: ReviveProcessor,
    poison: DamageOverTimeProcessor,
    frostbite: DamageOverTimeProcessor,
    blister: DamageOverTimeProcessor,
    paralyze: ControlProcessor,
    petrify: ControlProcessor,
    fear: ControlProcessor,
    reduce_damage: ModifierProcessor,
    reduce_initiative: ModifierProcessor,
    reduce_armor: ModifierProcessor,
    increase_damage: ModifierProcessor,
    give_protection: ProtectionProcessor,
    summon: SummonProcessor,
    doppelganger: TransformProcessor,
    transform_self: TransformProcessor,
    transform_enemy: TransformProcessor,
}

impl Default for AttackProcessors {
    fn default() -> Self {
        Self::new()
    }
}

impl AttackProcessors {
    pub fn new() -> Self {
        use UnitAttackType::*;
        Self {
            damage: DamageProcessor::new(DamageKind::Plain),
            drain_life: DamageProcessor::new(DamageKind::DrainLife),
            drain_life_overflow: DamageProcessor::new(DamageKind::DrainLifeOverflow),
            heal: HealProcessor,
            cure: CureProcessor,
            revive: ReviveProcessor,
            poison: DamageOverTimeProcessor::new(Poison),
            frostbite: DamageOverTimeProcessor::new(Frostbite),
            blister: DamageOverTimeProcessor::new(Blister),
            paralyze: ControlProcessor::new(Paralyze),
            petrify: ControlProcessor::new(Petrify),
            fear: ControlProcessor::new(Fear),
            reduce_damage: ModifierProcessor::new(ReduceDamage),
            reduce_initiative: ModifierProcessor::new(ReduceInitiative),
            reduce_armor: ModifierProcessor::new(ReduceArmor),
            increase_damage: ModifierProcessor::new(IncreaseDamage),
            give_protection: ProtectionProcessor,
            summon: SummonProcessor,
            doppelganger: TransformProcessor::new(TransformKind::Doppelganger),
            transform_self: TransformProcessor::new(TransformKind::TransformSelf),
            transform_enemy: TransformProcessor::new(TransformKind::TransformEnemy),
        }
    }

    pub fn get(&self, attack_type: UnitAttackType) -> &dyn AttackTypeProcessor {
        use UnitAttackType::*;
        match attack_type {
            Damage => &self.damage,
            DrainLife => &self.drain_life,
            DrainLifeOverflow => &self.drain_life_overflow,
            Heal => &self.heal,
            Cure => &self.cure,
            Revive => &self.revive,
            Poison => &self.poison,
            Frostbite => &self.frostbite,
            Blister => &self.blister,
            Paralyze => &self.paralyze,
            Petrify => &self.petrify,
            Fear => &self.fear,
            ReduceDamage => &self.reduce_damage,
            ReduceInitiative => &self.reduce_initiative,
            ReduceArmor => &self.reduce_armor,
            IncreaseDamage => &self.increase_damage,
            GiveProtection => &self.give_protection,
            Summon => &self.summon,
            Doppelganger => &self.doppelganger,
            TransformSelf => &self.transform_self,
            TransformEnemy => &self.transform_enemy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_attack_type_maps_to_its_processor() {
        let processors = AttackProcessors::new();
        for attack_type in UnitAttackType::iter() {
            assert_eq!(processors.get(attack_type).attack_type(), attack_type);
        }
    }

    #[test]
    fn only_effect_attacks_against_enemies_can_be_skipped() {
        let processors = AttackProcessors::new();
        for attack_type in UnitAttackType::iter() {
            let skippable = processors.get(attack_type).can_main_attack_be_skipped();
            if skippable {
                assert!(attack_type.is_curable(), "{attack_type} should not be skippable");
            }
        }
        assert!(!processors.get(UnitAttackType::Damage).can_main_attack_be_skipped());
        assert!(processors.get(UnitAttackType::Paralyze).can_main_attack_be_skipped());
    }
}
