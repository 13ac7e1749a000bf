//! Text commands
//!
//! Commands are messages starting with the configured prefix. Names match
//! case-insensitively; arguments are whitespace separated.

mod parser;

pub use parser::{parse_bool, parse_command, ChannelArg, Command, ParseOutcome};

use counter_core::Snowflake;

/// Where and by whom a command was invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandContext {
    pub guild_id: Option<Snowflake>,
    pub channel_id: Snowflake,
    pub author_id: Snowflake,
    pub message_id: Snowflake,
    pub member_role_ids: Vec<Snowflake>,
}
