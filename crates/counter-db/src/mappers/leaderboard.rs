//! Leaderboard model -> entity mapper

use counter_core::entities::LeaderboardEntry;
use counter_core::value_objects::Snowflake;

use crate::models::LeaderboardModel;

impl From<LeaderboardModel> for LeaderboardEntry {
    fn from(model: LeaderboardModel) -> Self {
        LeaderboardEntry::new(
            Snowflake::new(model.channel_id),
            Snowflake::new(model.user_id),
            model.score,
        )
    }
}
