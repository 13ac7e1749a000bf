//! Leaderboard entity - per-user success count within a channel

use crate::value_objects::Snowflake;

/// Number of ranked rows a leaderboard shows
pub const LEADERBOARD_SIZE: usize = 15;

/// Cumulative score of one user in one counting channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardEntry {
    pub channel_id: Snowflake,
    pub user_id: Snowflake,
    pub score: i64,
}

impl LeaderboardEntry {
    /// Create a new entry
    #[must_use]
    pub fn new(channel_id: Snowflake, user_id: Snowflake, score: i64) -> Self {
        Self {
            channel_id,
            user_id,
            score,
        }
    }
}

/// Rank marker shown in front of a 1-based leaderboard position
///
/// The podium gets medals, everything after it a plain number.
#[must_use]
pub fn rank_marker(position: usize) -> String {
    match position {
        1 => "🥇".to_string(),
        2 => "🥈".to_string(),
        3 => "🥉".to_string(),
        n => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_markers() {
        assert_eq!(rank_marker(1), "🥇");
        assert_eq!(rank_marker(2), "🥈");
        assert_eq!(rank_marker(3), "🥉");
        assert_eq!(rank_marker(4), "4");
        assert_eq!(rank_marker(LEADERBOARD_SIZE), "15");
    }
}
