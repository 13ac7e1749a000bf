//! Database models - SQLx-compatible structs for PostgreSQL tables

mod counter;
mod leaderboard;

pub use counter::CounterModel;
pub use leaderboard::LeaderboardModel;
