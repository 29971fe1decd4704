//! Common error infrastructure for battle-core.
//!
//! Every fallible operation in the crate returns [`BattleError`]. Variants are
//! classified by [`ErrorSeverity`] so the scene boundary can decide whether to
//! log and continue or abort the battle.
//!
//! # Design Principles
//!
//! - **Exhaustive**: attack types are a closed enum, so an "unknown attack type"
//!   can't be constructed; the remaining invariant violations are target-kind
//!   mismatches and effect re-entry, both reported as values
//! - **Rich Context**: errors carry the unit and round they were raised for
//! - **Severity Classification**: content errors are fatal, sequencing errors
//!   are validation failures, broken invariants are internal

use crate::model::{UnitAttackType, UnitId, UnitTypeId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The request was rejected; battle state is untouched.
    ///
    /// Examples: target out of reach, effect already superseded
    Validation,

    /// Unexpected state inconsistency. These indicate bugs.
    ///
    /// Examples: slot target handed to a unit-only processor
    Internal,

    /// Missing content; the battle cannot continue.
    ///
    /// Examples: summon references a unit type absent from the catalog
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorContext {
    /// Unit the failing operation was acting for.
    pub unit: Option<UnitId>,

    /// Battle round at the time of error.
    pub round: u32,

    /// Optional static message providing additional context.
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(round: u32) -> Self {
        Self {
            unit: None,
            round,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Uniform classification interface shared by crate errors.
pub trait ClassifiedError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns the context information for this error, if available.
    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str;
}

/// Errors surfaced by battle rule evaluation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum BattleError {
    #[error("unit {unit} does not exist in this battle")]
    UnitNotFound { unit: UnitId, context: ErrorContext },

    #[error("unit type '{unit_type}' is not present in the catalog")]
    UnknownUnitType {
        unit_type: UnitTypeId,
        context: ErrorContext,
    },

    #[error("attack {attack_type} has no unit type to summon or transform into")]
    MissingTransformType {
        attack_type: UnitAttackType,
        context: ErrorContext,
    },

    #[error("attack {attack_type} expects a unit target")]
    UnitTargetRequired {
        attack_type: UnitAttackType,
        context: ErrorContext,
    },

    #[error("attack {attack_type} expects an empty slot target")]
    SlotTargetRequired {
        attack_type: UnitAttackType,
        context: ErrorContext,
    },

    #[error("attack {attack_type} does not produce a recurring effect")]
    EffectNotSupported {
        attack_type: UnitAttackType,
        context: ErrorContext,
    },

    #[error("cannot process {attack_type} effect on unit {unit}: effect is gone or already triggered")]
    CannotProcessEffect {
        unit: UnitId,
        attack_type: UnitAttackType,
        context: ErrorContext,
    },

    #[error("unit {unit} cannot be attacked with {attack_type}")]
    InvalidTarget {
        unit: UnitId,
        attack_type: UnitAttackType,
        context: ErrorContext,
    },

    #[error("unit {unit} already waited this round")]
    CannotWait { unit: UnitId, context: ErrorContext },

    #[error("no unit is currently acting")]
    NoCurrentUnit { context: ErrorContext },
}

impl BattleError {
    pub fn unit_not_found(unit: UnitId, round: u32) -> Self {
        Self::UnitNotFound {
            unit,
            context: ErrorContext::new(round).with_unit(unit),
        }
    }

    pub fn unknown_unit_type(unit_type: UnitTypeId, round: u32) -> Self {
        Self::UnknownUnitType {
            unit_type,
            context: ErrorContext::new(round).with_message("catalog lookup failed"),
        }
    }

    pub fn missing_transform_type(attack_type: UnitAttackType, round: u32) -> Self {
        Self::MissingTransformType {
            attack_type,
            context: ErrorContext::new(round),
        }
    }

    pub fn unit_target_required(attack_type: UnitAttackType, round: u32) -> Self {
        Self::UnitTargetRequired {
            attack_type,
            context: ErrorContext::new(round).with_message("slot target passed to unit attack"),
        }
    }

    pub fn slot_target_required(attack_type: UnitAttackType, round: u32) -> Self {
        Self::SlotTargetRequired {
            attack_type,
            context: ErrorContext::new(round).with_message("unit target passed to slot attack"),
        }
    }

    pub fn effect_not_supported(attack_type: UnitAttackType, round: u32) -> Self {
        Self::EffectNotSupported {
            attack_type,
            context: ErrorContext::new(round),
        }
    }

    pub fn cannot_process_effect(unit: UnitId, attack_type: UnitAttackType, round: u32) -> Self {
        Self::CannotProcessEffect {
            unit,
            attack_type,
            context: ErrorContext::new(round).with_unit(unit),
        }
    }

    pub fn invalid_target(unit: UnitId, attack_type: UnitAttackType, round: u32) -> Self {
        Self::InvalidTarget {
            unit,
            attack_type,
            context: ErrorContext::new(round).with_unit(unit),
        }
    }

    pub fn cannot_wait(unit: UnitId, round: u32) -> Self {
        Self::CannotWait {
            unit,
            context: ErrorContext::new(round).with_unit(unit),
        }
    }

    pub fn no_current_unit(round: u32) -> Self {
        Self::NoCurrentUnit {
            context: ErrorContext::new(round).with_message("turn queue has no acting unit"),
        }
    }
}

impl ClassifiedError for BattleError {
    fn severity(&self) -> ErrorSeverity {
        use BattleError::*;
        match self {
            UnknownUnitType { .. } | MissingTransformType { .. } => ErrorSeverity::Fatal,

            UnitNotFound { .. }
            | UnitTargetRequired { .. }
            | SlotTargetRequired { .. }
            | EffectNotSupported { .. }
            | NoCurrentUnit { .. } => ErrorSeverity::Internal,

            CannotProcessEffect { .. } | InvalidTarget { .. } | CannotWait { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        use BattleError::*;
        match self {
            UnitNotFound { context, .. }
            | UnknownUnitType { context, .. }
            | MissingTransformType { context, .. }
            | UnitTargetRequired { context, .. }
            | SlotTargetRequired { context, .. }
            | EffectNotSupported { context, .. }
            | CannotProcessEffect { context, .. }
            | InvalidTarget { context, .. }
            | CannotWait { context, .. }
            | NoCurrentUnit { context } => Some(context),
        }
    }

    fn error_code(&self) -> &'static str {
        use BattleError::*;
        match self {
            UnitNotFound { .. } => "BATTLE_UNIT_NOT_FOUND",
            UnknownUnitType { .. } => "BATTLE_UNKNOWN_UNIT_TYPE",
            MissingTransformType { .. } => "BATTLE_MISSING_TRANSFORM_TYPE",
            UnitTargetRequired { .. } => "BATTLE_UNIT_TARGET_REQUIRED",
            SlotTargetRequired { .. } => "BATTLE_SLOT_TARGET_REQUIRED",
            EffectNotSupported { .. } => "BATTLE_EFFECT_NOT_SUPPORTED",
            CannotProcessEffect { .. } => "BATTLE_CANNOT_PROCESS_EFFECT",
            InvalidTarget { .. } => "BATTLE_INVALID_TARGET",
            CannotWait { .. } => "BATTLE_CANNOT_WAIT",
            NoCurrentUnit { .. } => "BATTLE_NO_CURRENT_UNIT",
        }
    }
}

pub type BattleResult<T> = Result<T, BattleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_errors_are_fatal() {
        let err = BattleError::unknown_unit_type(UnitTypeId::new("ghost"), 3);
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert_eq!(err.error_code(), "BATTLE_UNKNOWN_UNIT_TYPE");
        assert_eq!(err.context().map(|c| c.round), Some(3));
    }

    #[test]
    fn superseded_effect_is_a_validation_failure() {
        let err = BattleError::cannot_process_effect(UnitId(4), UnitAttackType::Poison, 1);
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert!(!err.severity().is_internal());
        assert_eq!(err.context().and_then(|c| c.unit), Some(UnitId(4)));
    }
}
