//! Domain errors - error types for the domain layer
//!
//! The game engine itself never fails: every message maps to a decision.
//! What can fail is the store behind the repository traits.

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    /// The store could not be reached or rejected the statement
    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl DomainError {
    /// Get an error code string for logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::DatabaseError(_) => "DATABASE_ERROR",
        }
    }

    /// Check if this is an infrastructure failure (store unavailable etc.)
    pub fn is_infrastructure(&self) -> bool {
        matches!(self, Self::DatabaseError(_))
    }
}
