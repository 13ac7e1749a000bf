//! Counter entity - the running count of a tracked channel

use chrono::{DateTime, Utc};

use crate::value_objects::Snowflake;

/// Counting state of a tracked channel
///
/// A channel is tracked exactly as long as its counter row exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterState {
    pub channel_id: Snowflake,
    pub count: i64,
    pub last_user_id: Option<Snowflake>,
    pub updated_at: DateTime<Utc>,
}

impl CounterState {
    /// Create the initial state for a freshly started channel
    ///
    /// `starter` is recorded as the last counter so that whoever is named
    /// there cannot post the first number.
    #[must_use]
    pub fn new(channel_id: Snowflake, starter: Option<Snowflake>) -> Self {
        Self {
            channel_id,
            count: 0,
            last_user_id: starter,
            updated_at: Utc::now(),
        }
    }

    /// The value the next accepted message must carry
    #[inline]
    #[must_use]
    pub fn next_value(&self) -> i64 {
        self.count.saturating_add(1)
    }

    /// Whether `user_id` submitted the most recent accepted value
    #[inline]
    #[must_use]
    pub fn is_last_user(&self, user_id: Snowflake) -> bool {
        self.last_user_id == Some(user_id)
    }

    /// Apply an accepted advance by `author`
    pub fn advance(&mut self, author: Snowflake) {
        self.count = self.next_value();
        self.last_user_id = Some(author);
        self.updated_at = Utc::now();
    }
}
