//! PostgreSQL implementation of CounterRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use counter_core::entities::CounterState;
use counter_core::game::Advance;
use counter_core::traits::{CounterRepository, RepoResult};
use counter_core::value_objects::Snowflake;

use crate::models::CounterModel;

use super::error::map_db_error;

/// PostgreSQL implementation of CounterRepository
#[derive(Clone)]
pub struct PgCounterRepository {
    pool: PgPool,
}

impl PgCounterRepository {
    /// Create a new PgCounterRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CounterRepository for PgCounterRepository {
    #[instrument(skip(self))]
    async fn find(&self, channel_id: Snowflake) -> RepoResult<Option<CounterState>> {
        let result = sqlx::query_as::<_, CounterModel>(
            r"
            SELECT channel_id, count, last_user_id, updated_at
            FROM counter
            WHERE channel_id = $1
            ",
        )
        .bind(channel_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(CounterState::from))
    }

    #[instrument(skip(self))]
    async fn list_channels(&self) -> RepoResult<Vec<Snowflake>> {
        let results = sqlx::query_scalar::<_, i64>(
            r"
            SELECT channel_id FROM counter ORDER BY channel_id
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Snowflake::new).collect())
    }

    #[instrument(skip(self), fields(channel_id = %state.channel_id))]
    async fn create(&self, state: &CounterState) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO counter (channel_id, count, last_user_id, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (channel_id) DO NOTHING
            ",
        )
        .bind(state.channel_id.into_inner())
        .bind(state.count)
        .bind(state.last_user_id.map(Snowflake::into_inner))
        .bind(state.updated_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn delete(&self, channel_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM counter WHERE channel_id = $1
            ",
        )
        .bind(channel_id.into_inner())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self), fields(channel_id = %advance.channel_id, new_count = advance.new_count))]
    async fn apply_advance(&self, advance: &Advance) -> RepoResult<bool> {
        // Counter and score move together or not at all
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let updated = sqlx::query(
            r"
            UPDATE counter
            SET count = $3, last_user_id = $4, updated_at = NOW()
            WHERE channel_id = $1 AND count = $2
            ",
        )
        .bind(advance.channel_id.into_inner())
        .bind(advance.previous_count)
        .bind(advance.new_count)
        .bind(advance.author_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        if updated.rows_affected() == 0 {
            debug!("Counter moved or was removed, advance not applied");
            tx.rollback().await.map_err(map_db_error)?;
            return Ok(false);
        }

        sqlx::query(
            r"
            INSERT INTO leaderboard (channel_id, user_id, score)
            VALUES ($1, $2, 1)
            ON CONFLICT (channel_id, user_id) DO UPDATE SET score = leaderboard.score + 1
            ",
        )
        .bind(advance.channel_id.into_inner())
        .bind(advance.author_id.into_inner())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgCounterRepository>();
    }
}
