//! Counting game rules

mod engine;

pub use engine::{
    decide, parse_count, Advance, CountAttempt, CountLiteral, Decision, IgnoreReason,
};
