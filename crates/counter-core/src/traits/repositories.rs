//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation.

use async_trait::async_trait;

use crate::entities::{CounterState, LeaderboardEntry};
use crate::error::DomainError;
use crate::game::Advance;
use crate::value_objects::Snowflake;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Counter Repository
// ============================================================================

#[async_trait]
pub trait CounterRepository: Send + Sync {
    /// Find the counter of a channel (None if the channel is not tracked)
    async fn find(&self, channel_id: Snowflake) -> RepoResult<Option<CounterState>>;

    /// List all tracked channel IDs
    async fn list_channels(&self) -> RepoResult<Vec<Snowflake>>;

    /// Start tracking a channel
    ///
    /// Returns false and leaves the existing row untouched if the channel is
    /// already tracked.
    async fn create(&self, state: &CounterState) -> RepoResult<bool>;

    /// Stop tracking a channel
    ///
    /// Returns false if the channel was not tracked. Leaderboard rows are kept.
    async fn delete(&self, channel_id: Snowflake) -> RepoResult<bool>;

    /// Commit an accepted advance
    ///
    /// Moves the counter from `previous_count` to `new_count`, records the
    /// author as last user and credits the author's leaderboard score, all in
    /// one transaction. Returns false without changes if the counter no longer
    /// holds `previous_count`.
    async fn apply_advance(&self, advance: &Advance) -> RepoResult<bool>;
}

// ============================================================================
// Leaderboard Repository
// ============================================================================

#[async_trait]
pub trait LeaderboardRepository: Send + Sync {
    /// Highest scores of a channel, by score descending then user ID ascending
    async fn top(&self, channel_id: Snowflake, limit: i64) -> RepoResult<Vec<LeaderboardEntry>>;

    /// Score of one user in one channel
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<LeaderboardEntry>>;
}
