//! Battle effects attached to units.
//!
//! # Round-based Duration
//!
//! An effect decrements once per round, on the turn of its controlling unit.
//! `round_triggered` records the last round it fired so a second pass in the
//! same round (e.g. a unit that waited and comes back) is a no-op.

use super::{UnitAttackSource, UnitAttackType, UnitId, UnitProtection};

/// Remaining lifetime of an effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    Active { turns: u32 },
    Infinite,
    Completed,
}

impl EffectDuration {
    /// `Active` with zero turns collapses to `Completed`.
    pub const fn turns(turns: u32) -> Self {
        if turns == 0 {
            Self::Completed
        } else {
            Self::Active { turns }
        }
    }

    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    pub const fn remaining_turns(&self) -> Option<u32> {
        match self {
            Self::Active { turns } => Some(*turns),
            _ => None,
        }
    }

    /// Burns one turn. `Infinite` and `Completed` are unchanged.
    pub fn decrease_turn(&mut self) {
        if let Self::Active { turns } = *self {
            *self = Self::turns(turns.saturating_sub(1));
        }
    }

    pub fn complete(&mut self) {
        *self = Self::Completed;
    }

    /// Orders durations for replacement checks: `Infinite` beats any `Active`,
    /// `Completed` loses to everything.
    pub fn is_longer_than(&self, other: &EffectDuration) -> bool {
        self.rank() > other.rank()
    }

    const fn rank(&self) -> u64 {
        match self {
            Self::Completed => 0,
            Self::Active { turns } => *turns as u64,
            Self::Infinite => u64::MAX,
        }
    }
}

/// An active status effect on a unit.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitBattleEffect {
    pub attack_type: UnitAttackType,
    pub source: UnitAttackSource,
    pub duration: EffectDuration,
    /// Unit whose turn decrements this effect.
    pub controlling_unit: UnitId,
    pub round_triggered: Option<u32>,
    pub power: Option<u32>,
    /// Wards granted by a `GiveProtection` effect; consumed one by one.
    pub protections: Vec<UnitProtection>,
    /// Unit displaced by a transformation or summon, restored when this effect ends.
    pub linked_unit: Option<UnitId>,
}

impl UnitBattleEffect {
    pub fn new(
        attack_type: UnitAttackType,
        source: UnitAttackSource,
        duration: EffectDuration,
        controlling_unit: UnitId,
    ) -> Self {
        Self {
            attack_type,
            source,
            duration,
            controlling_unit,
            round_triggered: None,
            power: None,
            protections: Vec::new(),
            linked_unit: None,
        }
    }

    pub fn with_power(mut self, power: u32) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_protections(mut self, protections: Vec<UnitProtection>) -> Self {
        self.protections = protections;
        self
    }

    pub fn with_linked_unit(mut self, unit: UnitId) -> Self {
        self.linked_unit = Some(unit);
        self
    }

    /// Marks the effect as already handled this round.
    pub fn triggered_in(mut self, round: u32) -> Self {
        self.round_triggered = Some(round);
        self
    }

    /// Counted-down effects that have not fired yet in `round`. Infinite
    /// effects never come due.
    pub fn is_due(&self, round: u32) -> bool {
        matches!(self.duration, EffectDuration::Active { .. })
            && self.round_triggered.is_none_or(|r| r < round)
    }

    /// Decrements the duration once for `round`. Returns `false` when the
    /// effect already fired this round or is completed.
    pub fn trigger(&mut self, round: u32) -> bool {
        if !self.is_due(round) {
            return false;
        }
        self.round_triggered = Some(round);
        self.duration.decrease_turn();
        true
    }

    pub fn force_complete(&mut self) {
        self.duration.complete();
    }

    /// Replacement policy for single-per-type effects: stronger power always
    /// wins, equal power wins only with a longer duration, weaker never wins.
    pub fn can_be_replaced_by(&self, power: Option<u32>, duration: &EffectDuration) -> bool {
        let current = self.power.unwrap_or(0);
        let incoming = power.unwrap_or(0);
        match incoming.cmp(&current) {
            core::cmp::Ordering::Greater => true,
            core::cmp::Ordering::Equal => duration.is_longer_than(&self.duration),
            core::cmp::Ordering::Less => false,
        }
    }
}

/// Effects held by one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitEffects {
    effects: Vec<UnitBattleEffect>,
}

impl UnitEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, attack_type: UnitAttackType) -> Option<&UnitBattleEffect> {
        self.effects.iter().find(|e| e.attack_type == attack_type)
    }

    pub fn get_mut(&mut self, attack_type: UnitAttackType) -> Option<&mut UnitBattleEffect> {
        self.effects.iter_mut().find(|e| e.attack_type == attack_type)
    }

    pub fn has(&self, attack_type: UnitAttackType) -> bool {
        self.get(attack_type).is_some()
    }

    /// Adds an effect. Ward grants stack; every other type replaces the
    /// existing effect of the same type.
    pub fn insert(&mut self, effect: UnitBattleEffect) {
        if effect.attack_type != UnitAttackType::GiveProtection {
            self.effects.retain(|e| e.attack_type != effect.attack_type);
        }
        self.effects.push(effect);
    }

    pub fn remove(&mut self, attack_type: UnitAttackType) -> Vec<UnitBattleEffect> {
        self.drain_where(|e| e.attack_type == attack_type)
    }

    /// Removes every completed effect and returns them.
    pub fn remove_completed(&mut self) -> Vec<UnitBattleEffect> {
        self.drain_where(|e| e.duration.is_completed())
    }

    pub fn drain_where(&mut self, mut predicate: impl FnMut(&UnitBattleEffect) -> bool) -> Vec<UnitBattleEffect> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.effects.len());
        for effect in self.effects.drain(..) {
            if predicate(&effect) {
                removed.push(effect);
            } else {
                kept.push(effect);
            }
        }
        self.effects = kept;
        removed
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnitBattleEffect> {
        self.effects.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut UnitBattleEffect> {
        self.effects.iter_mut()
    }

    /// Sum of `power` over effects of the given type.
    pub fn total_power(&self, attack_type: UnitAttackType) -> u32 {
        self.effects
            .iter()
            .filter(|e| e.attack_type == attack_type && !e.duration.is_completed())
            .filter_map(|e| e.power)
            .sum()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn poison(turns: u32, power: u32) -> UnitBattleEffect {
        UnitBattleEffect::new(
            UnitAttackType::Poison,
            UnitAttackSource::Death,
            EffectDuration::turns(turns),
            UnitId(1),
        )
        .with_power(power)
    }

    #[test]
    fn trigger_is_idempotent_per_round() {
        let mut effect = poison(3, 5);

        assert!(effect.trigger(1));
        assert!(!effect.trigger(1));
        assert_eq!(effect.duration, EffectDuration::Active { turns: 2 });

        assert!(effect.trigger(2));
        assert!(effect.trigger(3));
        assert!(effect.duration.is_completed());
        assert!(!effect.trigger(4));
    }

    #[test]
    fn infinite_duration_never_runs_out() {
        let mut duration = EffectDuration::Infinite;
        for _ in 0..10 {
            duration.decrease_turn();
        }
        assert_eq!(duration, EffectDuration::Infinite);
        duration.complete();
        assert!(duration.is_completed());
    }

    #[test]
    fn replacement_prefers_power_then_duration() {
        let existing = poison(2, 10);

        assert!(existing.can_be_replaced_by(Some(11), &EffectDuration::turns(1)));
        assert!(existing.can_be_replaced_by(Some(10), &EffectDuration::turns(3)));
        assert!(!existing.can_be_replaced_by(Some(10), &EffectDuration::turns(2)));
        assert!(!existing.can_be_replaced_by(Some(9), &EffectDuration::Infinite));
    }

    #[test]
    fn ward_grants_stack_but_other_types_replace() {
        let mut effects = UnitEffects::new();
        effects.insert(poison(2, 5));
        effects.insert(poison(3, 7));
        assert_eq!(effects.len(), 1);
        assert_eq!(effects.get(UnitAttackType::Poison).and_then(|e| e.power), Some(7));

        let ward = UnitBattleEffect::new(
            UnitAttackType::GiveProtection,
            UnitAttackSource::Life,
            EffectDuration::turns(1),
            UnitId(2),
        );
        effects.insert(ward.clone());
        effects.insert(ward);
        assert_eq!(effects.len(), 3);
    }
}
