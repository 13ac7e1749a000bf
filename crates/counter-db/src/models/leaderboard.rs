//! Leaderboard database model

use sqlx::FromRow;

/// Database model for the leaderboard table
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardModel {
    pub channel_id: i64,
    pub user_id: i64,
    pub score: i64,
}
