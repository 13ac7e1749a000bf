//! Counting game decision logic
//!
//! `decide` maps an incoming message and the channel's current counter to a
//! [`Decision`]. It performs no I/O: the caller loads the state, applies the
//! returned delta and performs the platform side effect.

use crate::entities::CounterState;
use crate::value_objects::Snowflake;

/// A message as seen by the game engine
#[derive(Debug, Clone, Copy)]
pub struct CountAttempt<'a> {
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    /// Author is an automated account
    pub author_is_bot: bool,
    /// Message was consumed by a registered command
    pub is_command: bool,
    pub content: &'a str,
}

/// Why a message was left alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    BotAuthor,
    Command,
    Untracked,
}

/// State delta produced by an accepted message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Advance {
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    /// Count held before this message
    pub previous_count: i64,
    /// Count after applying this message
    pub new_count: i64,
}

/// Outcome of evaluating one message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Ignore(IgnoreReason),
    /// Content is not a non-negative integer literal
    RejectInvalid,
    /// Author already posted the previous number
    RejectSameAuthor,
    /// Number is not `count + 1`
    RejectWrongValue { expected: i64 },
    AcceptAdvance(Advance),
}

impl Decision {
    /// Whether the message has to be removed from the channel
    #[inline]
    #[must_use]
    pub fn should_delete(&self) -> bool {
        matches!(
            self,
            Self::RejectInvalid | Self::RejectSameAuthor | Self::RejectWrongValue { .. }
        )
    }

    /// Short label for logs
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Ignore(_) => "ignore",
            Self::RejectInvalid => "reject_invalid",
            Self::RejectSameAuthor => "reject_same_author",
            Self::RejectWrongValue { .. } => "reject_wrong_value",
            Self::AcceptAdvance(_) => "accept_advance",
        }
    }
}

/// A syntactically valid count literal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountLiteral {
    Value(i64),
    /// Only digits, but larger than any reachable count
    TooLarge,
}

/// Parse message content as a count literal
///
/// Accepts ASCII digits only: no sign, no whitespace, nothing around them.
/// Leading zeros are allowed (`"007"` is 7).
#[must_use]
pub fn parse_count(content: &str) -> Option<CountLiteral> {
    if content.is_empty() || !content.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    Some(match content.parse::<i64>() {
        Ok(value) => CountLiteral::Value(value),
        Err(_) => CountLiteral::TooLarge,
    })
}

/// Decide what to do with a message
///
/// Checks run in a fixed order and the first match wins: ignore rules,
/// literal validity, turn alternation, then the value itself.
#[must_use]
pub fn decide(attempt: &CountAttempt<'_>, state: Option<&CounterState>) -> Decision {
    if attempt.author_is_bot {
        return Decision::Ignore(IgnoreReason::BotAuthor);
    }
    if attempt.is_command {
        return Decision::Ignore(IgnoreReason::Command);
    }

    let Some(state) = state else {
        return Decision::Ignore(IgnoreReason::Untracked);
    };

    let Some(literal) = parse_count(attempt.content) else {
        return Decision::RejectInvalid;
    };

    if state.is_last_user(attempt.author_id) {
        return Decision::RejectSameAuthor;
    }

    let expected = state.next_value();
    match literal {
        CountLiteral::Value(value) if value == expected && expected > state.count => {
            Decision::AcceptAdvance(Advance {
                channel_id: state.channel_id,
                author_id: attempt.author_id,
                previous_count: state.count,
                new_count: expected,
            })
        }
        _ => Decision::RejectWrongValue { expected },
    }
}
