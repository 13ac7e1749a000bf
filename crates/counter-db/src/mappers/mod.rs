//! Model to entity mappers
//!
//! `From<Model> for Entity` conversions from database rows to counter-core
//! domain objects.

mod counter;
mod leaderboard;
