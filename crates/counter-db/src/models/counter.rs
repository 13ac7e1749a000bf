//! Counter database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the counter table
#[derive(Debug, Clone, FromRow)]
pub struct CounterModel {
    pub channel_id: i64,
    pub count: i64,
    /// Author of the last accepted number, or the bot right after start
    pub last_user_id: Option<i64>,
    pub updated_at: DateTime<Utc>,
}
