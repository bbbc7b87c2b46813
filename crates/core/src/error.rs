//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Why a cashbook command or lookup was refused.
///
/// Only deterministic failures live here; storage and transport errors are
/// wrapped by the layers that own them.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input that can never be accepted as-is (blank name, negative amount).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A payment names somebody who has not joined the cashbook.
    #[error("'{0}' is not a participant of this cashbook")]
    UnknownParticipant(String),

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// An identifier could not be parsed.
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    #[error("cashbook not found")]
    NotFound,

    /// The command collides with recorded state (duplicate name, stale version).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn unknown_participant(name: impl Into<String>) -> Self {
        Self::UnknownParticipant(name.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::InvariantViolation(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    /// True when the caller sent something that can never succeed unchanged.
    pub fn is_rejected_input(&self) -> bool {
        matches!(
            self,
            DomainError::Validation(_) | DomainError::UnknownParticipant(_) | DomainError::InvalidId(_)
        )
    }
}
