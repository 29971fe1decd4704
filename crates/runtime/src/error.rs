//! Errors raised while driving a unit's turn.

use battle_core::{BattleError, ClassifiedError, ErrorSeverity, UnitTypeId};
use thiserror::Error;

use crate::host::{BattleDirection, BattleUnitAction};

pub type ControllerResult<T> = std::result::Result<T, ControllerError>;

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Battle(#[from] BattleError),

    #[error("no {action:?} animation for unit type '{unit_type}' facing {direction:?}")]
    MissingAnimation {
        unit_type: UnitTypeId,
        direction: BattleDirection,
        action: BattleUnitAction,
    },

    #[error("no {action:?} sound for unit type '{unit_type}'")]
    MissingSound {
        unit_type: UnitTypeId,
        action: BattleUnitAction,
    },
}

impl ControllerError {
    /// Severity used by the scene boundary to decide whether to keep going.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Battle(err) => err.severity(),
            Self::MissingAnimation { .. } | Self::MissingSound { .. } => ErrorSeverity::Fatal,
        }
    }
}

#[cfg(test)]
mod tests {
    use battle_core::{UnitAttackType, UnitId};

    use super::*;

    #[test]
    fn missing_content_is_fatal() {
        let err = ControllerError::MissingSound {
            unit_type: UnitTypeId::new("archer"),
            action: BattleUnitAction::Attack,
        };
        assert_eq!(err.severity(), ErrorSeverity::Fatal);
        assert!(err.to_string().contains("archer"));
    }

    #[test]
    fn battle_errors_keep_their_severity() {
        let err: ControllerError = BattleError::cannot_process_effect(UnitId(2), UnitAttackType::Poison, 4).into();
        assert_eq!(err.severity(), ErrorSeverity::Validation);
    }
}
