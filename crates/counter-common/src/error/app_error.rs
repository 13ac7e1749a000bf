//! Application error types
//!
//! Errors that end the bot process. Everything recoverable is handled
//! inside the service layer; what reaches `main` is logged and exits 1.

use counter_core::DomainError;

use crate::config::ConfigError;

/// Process-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Platform error: {0}")]
    Platform(String),

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Short error code for structured logs
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Platform(_) => "PLATFORM_ERROR",
            Self::Gateway(_) => "GATEWAY_ERROR",
            Self::Domain(e) => e.code(),
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the failure came from the persistent store
    #[must_use]
    pub fn is_storage(&self) -> bool {
        match self {
            Self::Database(_) => true,
            Self::Domain(e) => matches!(e, DomainError::DatabaseError(_)),
            _ => false,
        }
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }

    pub fn gateway(msg: impl Into<String>) -> Self {
        Self::Gateway(msg.into())
    }

    pub fn platform(msg: impl Into<String>) -> Self {
        Self::Platform(msg.into())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

/// Result type alias for process-level operations
pub type AppResult<T> = Result<T, AppError>;
