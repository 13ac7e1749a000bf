//! Chat platform port
//!
//! The services never talk HTTP themselves. The gateway crate provides the
//! REST-backed implementation; tests use a recording fake.

use std::time::Duration;

use async_trait::async_trait;
use counter_core::Snowflake;

use crate::dto::Embed;

/// Result type for platform calls
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Failures reported by the chat platform
#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    /// The bot lacks the permission for this action
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Target channel or message does not exist (anymore)
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Transport failure or unexpected status
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Failed to decode platform response: {0}")]
    Decode(String),
}

impl PlatformError {
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// The platform refused or could not apply the request
    ///
    /// Such failures concern a single message or channel and never leave the
    /// bot in an inconsistent state.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::Forbidden(_) | Self::NotFound(_) | Self::RateLimited { .. }
        )
    }

    /// Short error code for logs
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Http(_) => "HTTP_ERROR",
            Self::Decode(_) => "DECODE_ERROR",
        }
    }
}

/// Outbound operations the bot performs on the chat platform
#[async_trait]
pub trait ChatPlatform: Send + Sync {
    /// Post a plain text message
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()>;

    /// Post a message consisting of a single embed
    async fn send_embed(&self, channel_id: Snowflake, embed: &Embed) -> PlatformResult<()>;

    /// Remove a message from a channel
    async fn delete_message(&self, channel_id: Snowflake, message_id: Snowflake)
        -> PlatformResult<()>;

    /// Set the per-user rate limit of a channel; 0 disables it
    async fn set_slowmode(
        &self,
        channel_id: Snowflake,
        seconds: u32,
        reason: &str,
    ) -> PlatformResult<()>;

    /// Display name of a channel
    async fn channel_name(&self, channel_id: Snowflake) -> PlatformResult<String>;
}
