//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in counter-core.

mod counter;
mod error;
mod leaderboard;

pub use counter::PgCounterRepository;
pub use leaderboard::PgLeaderboardRepository;
