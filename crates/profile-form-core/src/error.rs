//! Domain error types.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// A single field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field path, e.g. `firstName` or `techStack.2.value`.
    pub field: String,
    /// Machine-readable rule code (`required`, `min_length`, `pattern`).
    pub code: &'static str,
    /// Human-readable message shown next to the field.
    pub message: String,
}

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An aggregate was not found.
    #[error("aggregate not found: {0}")]
    AggregateNotFound(Uuid),

    /// Optimistic concurrency conflict.
    #[error(
        "concurrency conflict on aggregate {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The aggregate that had the conflict.
        aggregate_id: Uuid,
        /// The expected version.
        expected: i64,
        /// The actual version found.
        actual: i64,
    },

    /// A malformed command.
    #[error("validation error: {0}")]
    Validation(String),

    /// One or more fields failed their validation rules.
    #[error("{} field(s) failed validation", .0.len())]
    InvalidFields(Vec<FieldViolation>),

    /// The command is not allowed in the aggregate's current state.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// An infrastructure error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
