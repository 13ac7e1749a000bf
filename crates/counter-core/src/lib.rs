//! # counter-core
//!
//! Domain layer of the counting bot: entities, value objects, the game
//! engine, and repository traits.
//! This crate has zero dependencies on infrastructure (database, gateway, etc.).

pub mod entities;
pub mod error;
pub mod game;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{rank_marker, CounterState, LeaderboardEntry, LEADERBOARD_SIZE};
pub use error::DomainError;
pub use game::{decide, Advance, CountAttempt, Decision, IgnoreReason};
pub use traits::{CounterRepository, LeaderboardRepository, RepoResult};
pub use value_objects::{
    apply_overwrites, OverwriteTarget, PermissionOverwrite, Permissions, Snowflake,
    SnowflakeParseError,
};
