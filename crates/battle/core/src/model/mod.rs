//! Combat data model.
//!
//! Immutable templates ([`UnitType`], [`UnitAttack`]) are loaded once and
//! shared; mutable per-battle state lives in [`Unit`], [`UnitBattleEffect`]
//! and [`Squad`], all owned by the battle context's unit arena.

mod attack;
mod common;
mod effect;
mod squad;
mod unit;
mod unit_type;

pub use attack::{
    ProtectionCategory, ProtectionTarget, UnitAttack, UnitAttackReach, UnitAttackSource,
    UnitAttackType, UnitProtection,
};
pub use common::{BattleSide, SquadLine, SquadPosition, UnitId, UnitTypeId};
pub use effect::{EffectDuration, UnitBattleEffect, UnitEffects};
pub use squad::Squad;
pub use unit::{Unit, UnitStatus};
pub use unit_type::{UnitBranch, UnitType};
