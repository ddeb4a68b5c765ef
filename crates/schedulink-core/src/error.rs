// Error types for the scheduling core

use thiserror::Error;

use crate::conflict::Conflict;

/// Result type alias for scheduling operations
pub type Result<T> = std::result::Result<T, SchedulingError>;

/// Errors that can occur while submitting, checking or approving schedule entries
#[derive(Debug, Error)]
pub enum SchedulingError {
    /// Input rejected before any conflict detection ran
    #[error("Validation error: {0}")]
    Validation(String),

    /// Unknown event, notification, venue or resource
    #[error("Not found: {0}")]
    NotFound(String),

    /// Approval blocked by an approved event (first conflict only)
    #[error("Cannot approve event due to conflict: {0}")]
    Conflict(Box<Conflict>),

    /// Submission blocked by one or more approved events
    #[error("Event conflicts with {} approved event(s)", .0.len())]
    Conflicts(Vec<Conflict>),

    /// Status change out of a terminal state
    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    /// Underlying persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl SchedulingError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        SchedulingError::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        SchedulingError::NotFound(msg.into())
    }

    /// Create a single-conflict error (approval path)
    pub fn conflict(conflict: Conflict) -> Self {
        SchedulingError::Conflict(Box::new(conflict))
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        SchedulingError::Storage(msg.into())
    }

    /// Create an invalid transition error
    pub fn invalid_transition(from: impl ToString, to: impl ToString) -> Self {
        SchedulingError::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Conflicts carried by this error, if any
    pub fn conflicts(&self) -> &[Conflict] {
        match self {
            SchedulingError::Conflict(conflict) => std::slice::from_ref(conflict.as_ref()),
            SchedulingError::Conflicts(conflicts) => conflicts,
            _ => &[],
        }
    }

    /// Whether this error comes from the persistence layer
    pub fn is_storage(&self) -> bool {
        matches!(self, SchedulingError::Storage(_) | SchedulingError::Internal(_))
    }
}
