//! Ошибки combat core
//!
//! Фатальных нет: битые данные деградируют конкретного актора (fallback в
//! Idle), сессия продолжается. Системы пишут ошибки в [`crate::logger`].

use crate::actions::ActionId;
use crate::state::ActorStateKind;

/// Как вызывающий реагирует на [`CombatError`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// Битые авторские данные (таблица action'ов, регистрация state'ов).
    /// Лог + самый безопасный state.
    Configuration,

    /// В этом цикле делать нечего (нет кандидатов, цель недостижима).
    /// Повтор на следующем decision tick.
    Transient,

    /// Runtime данные не были зарегистрированы: регистрируем default и
    /// продолжаем.
    Invariant,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Configuration => "configuration",
            Self::Transient => "transient",
            Self::Invariant => "invariant",
        }
    }
}

// ============================================================================
// CombatError
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("action '{0}' is not present in the action table")]
    UnknownAction(ActionId),

    #[error("no handler registered for state {0:?}")]
    UnregisteredState(ActorStateKind),

    #[error("action '{action}': window [{start}, {end}] is outside the normalized timeline")]
    InvalidWindow { action: ActionId, start: f32, end: f32 },

    #[error("action '{action}': {reason}")]
    InvalidDefinition { action: ActionId, reason: String },

    #[error("action '{0}' is defined more than once")]
    DuplicateAction(ActionId),

    #[error("state {state:?} requires an action but the request carried none")]
    MissingAction { state: ActorStateKind },

    #[error("state {state:?} requires a destination point but the request carried none")]
    MissingPoint { state: ActorStateKind },

    #[error("failed to parse action table: {0}")]
    TableParse(#[from] ron::error::SpannedError),
}

impl CombatError {
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CombatError::UnknownAction(_)
            | CombatError::UnregisteredState(_)
            | CombatError::InvalidWindow { .. }
            | CombatError::InvalidDefinition { .. }
            | CombatError::DuplicateAction(_)
            | CombatError::MissingAction { .. }
            | CombatError::MissingPoint { .. }
            | CombatError::TableParse(_) => ErrorSeverity::Configuration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_errors_are_classified() {
        let err = CombatError::UnknownAction(ActionId::from("missing"));
        assert_eq!(err.severity(), ErrorSeverity::Configuration);
        assert_eq!(
            err.to_string(),
            "action 'missing' is not present in the action table"
        );
    }
}
