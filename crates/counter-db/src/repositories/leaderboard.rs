//! PostgreSQL implementation of LeaderboardRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use counter_core::entities::LeaderboardEntry;
use counter_core::traits::{LeaderboardRepository, RepoResult};
use counter_core::value_objects::Snowflake;

use crate::models::LeaderboardModel;

use super::error::map_db_error;

/// PostgreSQL implementation of LeaderboardRepository
#[derive(Clone)]
pub struct PgLeaderboardRepository {
    pool: PgPool,
}

impl PgLeaderboardRepository {
    /// Create a new PgLeaderboardRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LeaderboardRepository for PgLeaderboardRepository {
    #[instrument(skip(self))]
    async fn top(&self, channel_id: Snowflake, limit: i64) -> RepoResult<Vec<LeaderboardEntry>> {
        let results = sqlx::query_as::<_, LeaderboardModel>(
            r"
            SELECT channel_id, user_id, score
            FROM leaderboard
            WHERE channel_id = $1
            ORDER BY score DESC, user_id ASC
            LIMIT $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(limit.max(0))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(LeaderboardEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<LeaderboardEntry>> {
        let result = sqlx::query_as::<_, LeaderboardModel>(
            r"
            SELECT channel_id, user_id, score
            FROM leaderboard
            WHERE channel_id = $1 AND user_id = $2
            ",
        )
        .bind(channel_id.into_inner())
        .bind(user_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(LeaderboardEntry::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgLeaderboardRepository>();
    }
}
