//! Gateway error types

use counter_common::AppError;
use counter_service::ServiceError;
use thiserror::Error;
use tokio_tungstenite::tungstenite;

use crate::protocol::CloseCode;

/// Gateway error type
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Socket could not be opened or broke mid-handshake
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// The server did not follow the handshake
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The server closed the session for good
    #[error("Gateway closed the session: {code} {reason}")]
    Closed { code: CloseCode, reason: String },

    /// Too many connection attempts failed in a row
    #[error("Gave up after {0} failed connection attempts")]
    ReconnectExhausted(u32),

    /// A fatal error while handling an event
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl GatewayError {
    /// Failures worth another connection attempt
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::WebSocket(_) | Self::Protocol(_))
    }
}

impl From<tungstenite::Error> for GatewayError {
    fn from(err: tungstenite::Error) -> Self {
        Self::WebSocket(err.to_string())
    }
}

impl From<GatewayError> for AppError {
    fn from(err: GatewayError) -> Self {
        match err {
            GatewayError::Service(e) => e.into(),
            other => AppError::gateway(other.to_string()),
        }
    }
}

/// Gateway result type
pub type GatewayResult<T> = Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;
    use counter_core::DomainError;

    #[test]
    fn test_transient_errors() {
        assert!(GatewayError::WebSocket("reset".into()).is_transient());
        assert!(GatewayError::Protocol("no hello".into()).is_transient());
        assert!(!GatewayError::Closed {
            code: CloseCode::AuthenticationFailed,
            reason: String::new()
        }
        .is_transient());
        assert!(!GatewayError::ReconnectExhausted(10).is_transient());
    }

    #[test]
    fn test_storage_failure_stays_storage() {
        let err = GatewayError::Service(ServiceError::Domain(DomainError::DatabaseError(
            "pool timed out".into(),
        )));
        let app: AppError = err.into();
        assert!(app.is_storage());
    }

    #[test]
    fn test_closed_maps_to_gateway() {
        let err = GatewayError::Closed {
            code: CloseCode::DisallowedIntents,
            reason: "Disallowed intent(s).".into(),
        };
        let app: AppError = err.into();
        assert_eq!(app.code(), "GATEWAY_ERROR");
        assert!(app.to_string().contains("4014"));
    }
}
