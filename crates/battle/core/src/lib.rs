//! Deterministic battle rules shared by the runtime and offline tools.
//!
//! `battle-core` defines the combat data model, the per-round turn order, the
//! attack type processors and the [`battle::BattleProcessor`] that resolves a
//! unit's action into results. It performs no I/O and keeps no clocks: every
//! mutation flows through a `&mut` [`BattleContext`] and every roll through a
//! [`BattleRng`].
pub mod battle;
pub mod config;
pub mod context;
pub mod env;
pub mod error;
pub mod model;
pub mod processor;
pub mod rng;
pub mod turn_queue;

pub use battle::{
    AttackResolution, BattleProcessor, ProcessorDescription, ProcessorOutcome, UnitActionProcessor,
    UnitActionType, UnitDeathProcessor, UnitRetreatedProcessor, UnitRetreatingProcessor,
};
pub use config::{BattleConfig, BattleTimings, InfiniteDurationPolicy};
pub use context::{AttackProcessorContext, AttackTarget, BattleContext};
pub use env::{BattleEnv, UnitTypeCatalog, UnitTypeOracle};
pub use error::{BattleError, BattleResult, ClassifiedError, ErrorContext, ErrorSeverity};
pub use model::{
    BattleSide, EffectDuration, ProtectionCategory, ProtectionTarget, Squad, SquadLine,
    SquadPosition, Unit, UnitAttack, UnitAttackReach, UnitAttackSource, UnitAttackType,
    UnitBattleEffect, UnitBranch, UnitEffects, UnitId, UnitProtection, UnitStatus, UnitType,
    UnitTypeId,
};
pub use processor::{
    AppliedAttack, AppliedEffect, AttackOutcome, AttackProcessors, AttackTypeProcessor,
    CalculatedAttackResult, CalculatedEffectResult, EffectOutcome, TargetCategory,
};
pub use rng::{BattleRng, PcgRng, ScriptedRng};
pub use turn_queue::{QueuedTurn, UnitTurnQueue, initiative_order};
