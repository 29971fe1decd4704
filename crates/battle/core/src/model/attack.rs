//! Attack definitions.
//!
//! Attacks are immutable and live inside [`UnitType`](super::UnitType)
//! templates. The attack type selects the processor that resolves it; the
//! source is what wards and immunities are matched against.

use super::UnitTypeId;

/// Behaviour family of an attack. Every variant is handled by exactly one
/// processor in [`AttackProcessors`](crate::processor::AttackProcessors).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitAttackType {
    // ========================================================================
    // Direct damage
    // ========================================================================
    Damage,
    DrainLife,
    DrainLifeOverflow,

    // ========================================================================
    // Restoration
    // ========================================================================
    Heal,
    Cure,
    Revive,

    // ========================================================================
    // Damage over time
    // ========================================================================
    Poison,
    Frostbite,
    Blister,

    // ========================================================================
    // Control
    // ========================================================================
    Paralyze,
    Petrify,
    Fear,

    // ========================================================================
    // Stat modifiers
    // ========================================================================
    ReduceDamage,
    ReduceInitiative,
    ReduceArmor,
    IncreaseDamage,
    GiveProtection,

    // ========================================================================
    // Transformative
    // ========================================================================
    Summon,
    Doppelganger,
    TransformSelf,
    TransformEnemy,
}

impl UnitAttackType {
    /// Attack types that may only be used against the opposing squad.
    pub const fn is_enemy_only(self) -> bool {
        use UnitAttackType::*;
        matches!(
            self,
            Damage
                | DrainLife
                | DrainLifeOverflow
                | Poison
                | Frostbite
                | Blister
                | Paralyze
                | Petrify
                | Fear
                | ReduceDamage
                | ReduceInitiative
                | ReduceArmor
                | TransformEnemy
        )
    }

    /// Attack types that leave a [`UnitBattleEffect`](super::UnitBattleEffect) behind.
    pub const fn leaves_effect(self) -> bool {
        use UnitAttackType::*;
        matches!(
            self,
            Poison
                | Frostbite
                | Blister
                | Paralyze
                | Petrify
                | Fear
                | ReduceDamage
                | ReduceInitiative
                | ReduceArmor
                | IncreaseDamage
                | GiveProtection
                | Summon
                | Doppelganger
                | TransformSelf
                | TransformEnemy
        )
    }

    /// Effects a cure removes: lasting effects that only enemies can cause.
    pub const fn is_curable(self) -> bool {
        self.is_enemy_only() && self.leaves_effect()
    }

    /// Damage-over-time effects.
    pub const fn is_damage_over_time(self) -> bool {
        matches!(self, Self::Poison | Self::Frostbite | Self::Blister)
    }

    /// Effects that cost the affected unit its turn.
    pub const fn skips_turn(self) -> bool {
        matches!(self, Self::Paralyze | Self::Petrify)
    }
}

/// Element or medium of an attack, matched against wards and immunities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitAttackSource {
    Weapon,
    Mind,
    Life,
    Death,
    Fire,
    Water,
    Earth,
    Air,
}

/// Which units an attack can reach.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitAttackReach {
    /// Melee: closest enemies of the nearest occupied line.
    Adjacent,
    /// Any single unit.
    Any,
    /// Every valid unit on the target side.
    All,
}

/// What a protection matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtectionTarget {
    Source(UnitAttackSource),
    AttackType(UnitAttackType),
}

impl ProtectionTarget {
    pub fn matches(&self, attack: &UnitAttack) -> bool {
        match *self {
            Self::Source(source) => attack.source == source,
            Self::AttackType(attack_type) => attack.attack_type == attack_type,
        }
    }
}

/// Whether a protection holds forever or breaks after one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ProtectionCategory {
    /// Blocks exactly one matching attack, then is consumed.
    Ward,
    /// Blocks every matching attack.
    Immunity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitProtection {
    pub target: ProtectionTarget,
    pub category: ProtectionCategory,
}

impl UnitProtection {
    pub const fn ward(target: ProtectionTarget) -> Self {
        Self {
            target,
            category: ProtectionCategory::Ward,
        }
    }

    pub const fn immunity(target: ProtectionTarget) -> Self {
        Self {
            target,
            category: ProtectionCategory::Immunity,
        }
    }
}

/// Immutable attack definition.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitAttack {
    pub attack_type: UnitAttackType,
    pub source: UnitAttackSource,
    pub reach: UnitAttackReach,
    pub initiative: u32,
    /// Hit chance in percent; 100 never misses.
    pub accuracy: u32,
    /// Damage, heal amount, effect strength or modifier percent depending on type.
    pub power: u32,
    /// Long-lasting variant: randomised or unlimited effect duration.
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_infinite: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub is_critical: bool,
    /// Sources warded by a `GiveProtection` attack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub ward_sources: Vec<UnitAttackSource>,
    /// Unit type produced by `Summon`, `TransformSelf` and `TransformEnemy`.
    #[cfg_attr(feature = "serde", serde(default))]
    pub transform_unit_type: Option<UnitTypeId>,
    /// Attack a unit may choose instead of its main one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub alternative: Option<Box<UnitAttack>>,
}

impl UnitAttack {
    pub fn new(attack_type: UnitAttackType, source: UnitAttackSource, reach: UnitAttackReach) -> Self {
        Self {
            attack_type,
            source,
            reach,
            initiative: 50,
            accuracy: 80,
            power: 0,
            is_infinite: false,
            is_critical: false,
            ward_sources: Vec::new(),
            transform_unit_type: None,
            alternative: None,
        }
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = power;
        self
    }

    pub fn with_accuracy(mut self, accuracy: u32) -> Self {
        self.accuracy = accuracy;
        self
    }

    pub fn with_initiative(mut self, initiative: u32) -> Self {
        self.initiative = initiative;
        self
    }

    pub fn infinite(mut self) -> Self {
        self.is_infinite = true;
        self
    }

    pub fn critical(mut self) -> Self {
        self.is_critical = true;
        self
    }

    pub fn with_ward_sources(mut self, sources: impl IntoIterator<Item = UnitAttackSource>) -> Self {
        self.ward_sources = sources.into_iter().collect();
        self
    }

    pub fn with_transform_unit_type(mut self, unit_type: UnitTypeId) -> Self {
        self.transform_unit_type = Some(unit_type);
        self
    }

    pub fn with_alternative(mut self, alternative: UnitAttack) -> Self {
        self.alternative = Some(Box::new(alternative));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn curable_effects_are_enemy_only() {
        for attack_type in UnitAttackType::iter() {
            if attack_type.is_curable() {
                assert!(attack_type.is_enemy_only(), "{attack_type} is curable");
            }
        }
        assert!(UnitAttackType::Poison.is_curable());
        assert!(UnitAttackType::TransformEnemy.is_curable());
        assert!(!UnitAttackType::IncreaseDamage.is_curable());
        assert!(!UnitAttackType::Damage.is_curable());
    }

    #[test]
    fn protection_matches_source_or_type() {
        let attack = UnitAttack::new(
            UnitAttackType::Poison,
            UnitAttackSource::Death,
            UnitAttackReach::Any,
        );
        assert!(ProtectionTarget::Source(UnitAttackSource::Death).matches(&attack));
        assert!(ProtectionTarget::AttackType(UnitAttackType::Poison).matches(&attack));
        assert!(!ProtectionTarget::Source(UnitAttackSource::Fire).matches(&attack));
    }
}
