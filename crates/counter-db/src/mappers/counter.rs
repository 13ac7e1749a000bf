//! Counter model -> entity mapper

use counter_core::entities::CounterState;
use counter_core::value_objects::Snowflake;

use crate::models::CounterModel;

/// Convert CounterModel to CounterState entity
impl From<CounterModel> for CounterState {
    fn from(model: CounterModel) -> Self {
        CounterState {
            channel_id: Snowflake::new(model.channel_id),
            count: model.count,
            last_user_id: model.last_user_id.map(Snowflake::new),
            updated_at: model.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_counter_model_to_entity() {
        let model = CounterModel {
            channel_id: 42,
            count: 5,
            last_user_id: Some(7),
            updated_at: Utc::now(),
        };

        let state = CounterState::from(model);
        assert_eq!(state.channel_id, Snowflake::new(42));
        assert_eq!(state.count, 5);
        assert!(state.is_last_user(Snowflake::new(7)));
    }

    #[test]
    fn test_null_last_user() {
        let model = CounterModel {
            channel_id: 42,
            count: 0,
            last_user_id: None,
            updated_at: Utc::now(),
        };

        assert_eq!(CounterState::from(model).last_user_id, None);
    }
}
