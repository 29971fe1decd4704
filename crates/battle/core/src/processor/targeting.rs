//! Target filters shared by attack processors.

use crate::context::{AttackProcessorContext, AttackTarget, BattleContext};
use crate::model::{BattleSide, SquadLine, Unit, UnitAttackReach};

/// Which units or slots an attack type may be aimed at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
pub enum TargetCategory {
    /// Active units of the opposing squad, subject to reach.
    Enemy,
    /// Active units of the attacker's own squad, the attacker included.
    Ally,
    /// Fallen units still holding a slot in the attacker's squad.
    DeadAlly,
    /// Slots of the attacker's squad without a living unit.
    EmptySlot,
    /// The attacker itself.
    OwnSelf,
    /// Any active unit other than the attacker.
    AnyOther,
}

impl TargetCategory {
    /// Friend/enemy filter and, for enemies, reach.
    pub fn accepts(self, ctx: &AttackProcessorContext<'_>, reach: UnitAttackReach) -> bool {
        let Ok(attacker) = ctx.attacker() else {
            return false;
        };
        match (self, ctx.target) {
            (Self::EmptySlot, AttackTarget::Slot { side, position }) => {
                side == attacker.side
                    && ctx
                        .battle
                        .unit_at(side, position)
                        .is_none_or(|unit| unit.is_dead())
            }
            (Self::EmptySlot, AttackTarget::Unit(_)) | (_, AttackTarget::Slot { .. }) => false,
            (category, AttackTarget::Unit(id)) => {
                let Ok(target) = ctx.battle.unit(id) else {
                    return false;
                };
                if !ctx.battle.squad(target.side).contains(id) {
                    return false;
                }
                match category {
                    Self::Enemy => {
                        target.is_active()
                            && target.side != attacker.side
                            && is_reachable(ctx.battle, attacker, target, reach)
                    }
                    Self::Ally => target.is_active() && target.side == attacker.side,
                    Self::DeadAlly => {
                        target.side == attacker.side && target.is_dead() && !target.is_retreated()
                    }
                    Self::OwnSelf => target.id == attacker.id,
                    Self::AnyOther => target.is_active() && target.id != attacker.id,
                    Self::EmptySlot => false,
                }
            }
        }
    }
}

/// Reach rule for attacks against the opposing squad.
///
/// `Adjacent` attackers must stand in the front line unless their own front
/// line is empty, and may only hit the nearest enemy line that still has
/// fighters. Within that line a target is reachable when its flank is at most
/// one step away, or is among the closest flanks when nothing is that near.
pub fn is_reachable(battle: &BattleContext, attacker: &Unit, target: &Unit, reach: UnitAttackReach) -> bool {
    if reach != UnitAttackReach::Adjacent {
        return true;
    }
    if attacker.position.line == SquadLine::Back && has_active_in_line(battle, attacker.side, SquadLine::Front) {
        return false;
    }

    let enemy_line = if has_active_in_line(battle, target.side, SquadLine::Front) {
        SquadLine::Front
    } else {
        SquadLine::Back
    };
    if target.position.line != enemy_line {
        return false;
    }

    let closest = battle
        .active_units(target.side)
        .filter(|unit| unit.position.line == enemy_line)
        .map(|unit| unit.position.flank_distance(&attacker.position))
        .min()
        .unwrap_or(0);
    target.position.flank_distance(&attacker.position) <= closest.max(1)
}

fn has_active_in_line(battle: &BattleContext, side: BattleSide, line: SquadLine) -> bool {
    battle.active_units(side).any(|unit| unit.position.line == line)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::model::{SquadPosition, UnitAttack, UnitAttackSource, UnitAttackType, UnitType};

    fn soldier() -> Arc<UnitType> {
        Arc::new(UnitType::new(
            "soldier",
            50,
            UnitAttack::new(UnitAttackType::Damage, UnitAttackSource::Weapon, UnitAttackReach::Adjacent),
        ))
    }

    fn reachable(battle: &BattleContext, attacker: crate::model::UnitId, target: crate::model::UnitId) -> bool {
        let attacker = battle.unit(attacker).unwrap();
        let target = battle.unit(target).unwrap();
        is_reachable(battle, attacker, target, UnitAttackReach::Adjacent)
    }

    #[test]
    fn adjacent_reaches_neighbouring_flanks_of_front_line() {
        let mut battle = BattleContext::new();
        let attacker = battle.add_unit(soldier(), BattleSide::Attacker, SquadPosition::front(0));
        let near = battle.add_unit(soldier(), BattleSide::Defender, SquadPosition::front(1));
        let far = battle.add_unit(soldier(), BattleSide::Defender, SquadPosition::front(2));
        let behind = battle.add_unit(soldier(), BattleSide::Defender, SquadPosition::back(0));

        assert!(reachable(&battle, attacker, near));
        assert!(!reachable(&battle, attacker, far));
        assert!(!reachable(&battle, attacker, behind));
    }

    #[test]
    fn adjacent_falls_back_to_closest_flank_and_back_line() {
        let mut battle = BattleContext::new();
        let attacker = battle.add_unit(soldier(), BattleSide::Attacker, SquadPosition::front(0));
        let far = battle.add_unit(soldier(), BattleSide::Defender, SquadPosition::front(2));
        assert!(reachable(&battle, attacker, far));

        battle.unit_mut(far).unwrap().set_hit_points(0);
        let behind = battle.add_unit(soldier(), BattleSide::Defender, SquadPosition::back(1));
        assert!(reachable(&battle, attacker, behind));
    }

    #[test]
    fn back_line_melee_is_blocked_by_own_front_line() {
        let mut battle = BattleContext::new();
        let guard = battle.add_unit(soldier(), BattleSide::Attacker, SquadPosition::front(1));
        let archer = battle.add_unit(soldier(), BattleSide::Attacker, SquadPosition::back(1));
        let enemy = battle.add_unit(soldier(), BattleSide::Defender, SquadPosition::front(1));

        assert!(!reachable(&battle, archer, enemy));
        battle.unit_mut(guard).unwrap().set_hit_points(0);
        assert!(reachable(&battle, archer, enemy));
    }
}
