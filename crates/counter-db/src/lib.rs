//! # counter-db
//!
//! Database layer implementing the counting bot's repository traits with
//! PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management
//! - Idempotent schema bootstrap (`counter` and `leaderboard` tables)
//! - Database models with SQLx `FromRow` derives
//! - Model → entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use counter_db::{create_pool, ensure_schema, DatabaseConfig, PgCounterRepository};
//! use counter_core::traits::CounterRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     ensure_schema(&pool).await?;
//!     let counters = PgCounterRepository::new(pool);
//!     let tracked = counters.list_channels().await?;
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, DatabaseConfig, PgPool};
pub use repositories::{PgCounterRepository, PgLeaderboardRepository};
pub use schema::ensure_schema;
