use std::sync::Arc;

use bitflags::bitflags;

use super::{
    BattleSide, ProtectionCategory, SquadPosition, UnitAttack, UnitAttackType, UnitEffects,
    UnitId, UnitProtection, UnitType,
};

bitflags! {
    /// Battle state flags of a [`Unit`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct UnitStatus: u8 {
        const DEAD       = 1 << 0;
        /// Leaves the battle at the start of its next turn.
        const RETREATING = 1 << 1;
        const RETREATED  = 1 << 2;
        const DEFENDING  = 1 << 3;
        const SUMMONED   = 1 << 4;
        const REVIVED    = 1 << 5;
        /// Swapped out of its squad slot (transformed, unsummoned).
        const REPLACED   = 1 << 6;
    }
}

/// Mutable battle participant.
///
/// # Invariants
///
/// - `hit_points <= max_hit_points()`
/// - `hit_points == 0` exactly when the unit is dead (a revived unit has at least 1)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Unit {
    pub id: UnitId,
    pub unit_type: Arc<UnitType>,
    pub side: BattleSide,
    pub position: SquadPosition,
    hit_points: u32,
    pub status: UnitStatus,
    pub experience: u32,
    /// Native protections copied from the type; wards are removed when consumed.
    pub protections: Vec<UnitProtection>,
    pub effects: UnitEffects,
}

impl Unit {
    pub fn new(id: UnitId, unit_type: Arc<UnitType>, side: BattleSide, position: SquadPosition) -> Self {
        Self {
            id,
            hit_points: unit_type.hit_points,
            protections: unit_type.protections.clone(),
            unit_type,
            side,
            position,
            status: UnitStatus::empty(),
            experience: 0,
            effects: UnitEffects::new(),
        }
    }

    pub fn hit_points(&self) -> u32 {
        self.hit_points
    }

    pub fn max_hit_points(&self) -> u32 {
        self.unit_type.hit_points
    }

    /// Sets hit points clamped to `[0, max]`, marking the unit dead at zero.
    pub fn set_hit_points(&mut self, hit_points: u32) {
        self.hit_points = hit_points.min(self.max_hit_points());
        if self.hit_points == 0 {
            self.status.insert(UnitStatus::DEAD);
        }
    }

    /// Subtracts damage, returning the amount actually lost.
    pub fn take_damage(&mut self, damage: u32) -> u32 {
        let dealt = damage.min(self.hit_points);
        self.set_hit_points(self.hit_points - dealt);
        dealt
    }

    /// Adds hit points up to the maximum, returning the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        if self.is_dead() {
            return 0;
        }
        let healed = amount.min(self.missing_hit_points());
        self.hit_points += healed;
        healed
    }

    pub fn missing_hit_points(&self) -> u32 {
        self.max_hit_points() - self.hit_points
    }

    pub fn revive(&mut self, hit_points: u32) {
        self.status.remove(UnitStatus::DEAD);
        self.status.insert(UnitStatus::REVIVED);
        self.hit_points = hit_points.clamp(1, self.max_hit_points().max(1));
    }

    pub fn is_dead(&self) -> bool {
        self.status.contains(UnitStatus::DEAD)
    }

    pub fn is_retreating(&self) -> bool {
        self.status.contains(UnitStatus::RETREATING)
    }

    pub fn is_retreated(&self) -> bool {
        self.status.contains(UnitStatus::RETREATED)
    }

    pub fn is_defending(&self) -> bool {
        self.status.contains(UnitStatus::DEFENDING)
    }

    pub fn is_summoned(&self) -> bool {
        self.status.contains(UnitStatus::SUMMONED)
    }

    pub fn is_replaced(&self) -> bool {
        self.status.contains(UnitStatus::REPLACED)
    }

    /// Present in its squad and still fighting.
    pub fn is_active(&self) -> bool {
        !self
            .status
            .intersects(UnitStatus::DEAD | UnitStatus::RETREATED | UnitStatus::REPLACED)
    }

    pub fn is_paralyzed(&self) -> bool {
        self.effects
            .iter()
            .any(|e| e.attack_type.skips_turn() && !e.duration.is_completed())
    }

    /// Armor after `ReduceArmor` effects, capped at `max_armor`.
    pub fn effective_armor(&self, max_armor: u32) -> u32 {
        self.unit_type
            .armor
            .saturating_sub(self.effects.total_power(UnitAttackType::ReduceArmor))
            .min(max_armor)
    }

    /// Percent applied to this unit's outgoing damage (100 = unmodified).
    pub fn damage_modifier_percent(&self) -> u32 {
        let boost = self.effects.total_power(UnitAttackType::IncreaseDamage);
        let lower = self.effects.total_power(UnitAttackType::ReduceDamage);
        (100 + boost).saturating_sub(lower)
    }

    /// Initiative after `ReduceInitiative` effects.
    pub fn effective_initiative(&self) -> u32 {
        let reduction = self.effects.total_power(UnitAttackType::ReduceInitiative).min(100);
        self.unit_type.initiative() * (100 - reduction) / 100
    }

    /// First protection (native or granted) matching `attack`. Immunities win
    /// over wards so a ward is never wasted on an attack that was blocked anyway.
    pub fn find_protection(&self, attack: &UnitAttack) -> Option<UnitProtection> {
        let granted = self.effects.iter().flat_map(|e| e.protections.iter());
        let mut matching = self
            .protections
            .iter()
            .chain(granted)
            .filter(|p| p.target.matches(attack))
            .copied()
            .collect::<Vec<_>>();
        matching.sort_by_key(|p| match p.category {
            ProtectionCategory::Immunity => 0,
            ProtectionCategory::Ward => 1,
        });
        matching.into_iter().next()
    }

    /// Removes one ward matching `protection`, preferring native wards.
    /// Ward-grant effects left without wards are completed.
    pub fn consume_ward(&mut self, protection: &UnitProtection) -> bool {
        if let Some(index) = self.protections.iter().position(|p| p == protection) {
            self.protections.remove(index);
            return true;
        }
        let mut consumed = false;
        for effect in self.effects.iter_mut() {
            if let Some(index) = effect.protections.iter().position(|p| p == protection) {
                effect.protections.remove(index);
                if effect.protections.is_empty() {
                    effect.force_complete();
                }
                consumed = true;
                break;
            }
        }
        if consumed {
            self.effects
                .drain_where(|e| e.attack_type == UnitAttackType::GiveProtection && e.duration.is_completed());
        }
        consumed
    }
}
