//! Domain entities - core business objects

mod counter;
mod leaderboard;

pub use counter::CounterState;
pub use leaderboard::{rank_marker, LeaderboardEntry, LEADERBOARD_SIZE};
