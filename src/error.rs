//! Error types for combat operations

use thiserror::Error;

/// Errors returned by encounter operations
///
/// Running out of legendary actions is not an error; it is reported through
/// the `success` field of the spend result.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CombatError {
    pub(crate) fn target(id: &str) -> Self {
        CombatError::NotFound {
            kind: "target",
            id: id.to_string(),
        }
    }

    pub(crate) fn entity(id: &str) -> Self {
        CombatError::NotFound {
            kind: "entity",
            id: id.to_string(),
        }
    }

    pub(crate) fn monster(id: &str) -> Self {
        CombatError::NotFound {
            kind: "monster",
            id: id.to_string(),
        }
    }

    pub(crate) fn stat_block(name: &str) -> Self {
        CombatError::NotFound {
            kind: "stat block",
            id: name.to_string(),
        }
    }
}

pub type Result<T, E = CombatError> = std::result::Result<T, E>;
