//! Schema bootstrap
//!
//! The bot owns two tables and creates them on startup if they are missing.

use sqlx::PgPool;
use tracing::{info, instrument};

const CREATE_COUNTER: &str = r"
    CREATE TABLE IF NOT EXISTS counter (
        channel_id   BIGINT PRIMARY KEY,
        count        BIGINT NOT NULL DEFAULT 0 CHECK (count >= 0),
        last_user_id BIGINT NULL,
        updated_at   TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
";

const CREATE_LEADERBOARD: &str = r"
    CREATE TABLE IF NOT EXISTS leaderboard (
        channel_id BIGINT NOT NULL,
        user_id    BIGINT NOT NULL,
        score      BIGINT NOT NULL DEFAULT 0 CHECK (score >= 0),
        PRIMARY KEY (channel_id, user_id)
    )
";

const CREATE_LEADERBOARD_RANK_INDEX: &str = r"
    CREATE INDEX IF NOT EXISTS idx_leaderboard_rank
        ON leaderboard (channel_id, score DESC, user_id ASC)
";

/// Create the bot's tables and indexes if they do not exist yet
#[instrument(skip(pool))]
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for statement in [CREATE_COUNTER, CREATE_LEADERBOARD, CREATE_LEADERBOARD_RANK_INDEX] {
        sqlx::query(statement).execute(&mut *tx).await?;
    }

    tx.commit().await?;

    info!("Database schema ready");
    Ok(())
}
