use thiserror::Error;

use super::types::SyncStatus;

/// Errors that can occur during configuration or synchronization.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifactuError {
    /// One or more local validation rules failed. Never reaches the network.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Credentials or endpoint configuration are unusable in live mode.
    #[error("configuration error: {0}")]
    Config(String),

    /// Network unreachable, timeout, or non-2xx response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The tax authority rejected the submission (terminal for this cycle).
    #[error("submission rejected: {0}")]
    Rejected(String),

    /// The requested status change is not allowed from the current state.
    #[error("invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// State the entity is currently in.
        from: SyncStatus,
        /// State the operation tried to reach.
        to: SyncStatus,
    },
}

/// A single validation error with field path and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "customer.fiscal_id").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl ValidationError {
    /// Create a validation error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Join a list of validation errors into a single message string.
#[must_use]
pub fn join_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
