//! Service layer error types
//!
//! Provides a unified error type for command and message handling, plus the
//! policy deciding which failures are absorbed and which stop the bot.

use counter_common::AppError;
use counter_core::DomainError;
use std::fmt;

use crate::platform::PlatformError;

/// Service layer error type
#[derive(Debug)]
pub enum ServiceError {
    /// Domain rule violation or store failure
    Domain(DomainError),

    /// Chat platform call failed
    Platform(PlatformError),

    /// Invoker lacks a permission the command requires
    PermissionDenied { permission: String },

    /// Registered command with unusable arguments
    Usage(String),

    /// Internal error
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Domain(e) => write!(f, "{e}"),
            Self::Platform(e) => write!(f, "{e}"),
            Self::PermissionDenied { permission } => {
                write!(f, "Missing required permission: {permission}")
            }
            Self::Usage(msg) => write!(f, "Usage error: {msg}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Domain(e) => Some(e),
            Self::Platform(e) => Some(e),
            _ => None,
        }
    }
}

impl ServiceError {
    /// Create a permission denied error
    pub fn permission_denied(permission: impl Into<String>) -> Self {
        Self::PermissionDenied {
            permission: permission.into(),
        }
    }

    /// Create a usage error
    pub fn usage(msg: impl Into<String>) -> Self {
        Self::Usage(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether the error is dropped silently instead of stopping the bot
    ///
    /// Invokers without permission, malformed arguments and messages or
    /// channels the platform refuses to touch are expected in normal
    /// operation. Everything else, store failures included, is fatal.
    pub fn is_swallowed(&self) -> bool {
        match self {
            Self::PermissionDenied { .. } | Self::Usage(_) => true,
            Self::Platform(e) => e.is_rejection(),
            Self::Domain(_) | Self::Internal(_) => false,
        }
    }

    /// Get the error code for logs
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::Platform(e) => e.code(),
            Self::PermissionDenied { .. } => "MISSING_PERMISSIONS",
            Self::Usage(_) => "USAGE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        Self::Domain(err)
    }
}

impl From<PlatformError> for ServiceError {
    fn from(err: PlatformError) -> Self {
        Self::Platform(err)
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::Platform(e) => AppError::platform(e.to_string()),
            other => AppError::Internal(anyhow::anyhow!(other.to_string())),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
