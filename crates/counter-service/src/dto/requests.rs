//! Inbound DTOs

use counter_core::{CountAttempt, Snowflake};

use crate::commands::CommandContext;

/// A message created in a channel the bot can see
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    /// None for direct messages
    pub guild_id: Option<Snowflake>,
    pub author_id: Snowflake,
    pub author_is_bot: bool,
    /// Role IDs of the author in the guild, as delivered with the event
    pub member_role_ids: Vec<Snowflake>,
    pub content: String,
}

impl IncomingMessage {
    /// Context for running a command triggered by this message
    #[must_use]
    pub fn command_context(&self) -> CommandContext {
        CommandContext {
            guild_id: self.guild_id,
            channel_id: self.channel_id,
            author_id: self.author_id,
            message_id: self.id,
            member_role_ids: self.member_role_ids.clone(),
        }
    }

    /// View of this message for the game engine
    #[must_use]
    pub fn count_attempt(&self, is_command: bool) -> CountAttempt<'_> {
        CountAttempt {
            channel_id: self.channel_id,
            author_id: self.author_id,
            author_is_bot: self.author_is_bot,
            is_command,
            content: &self.content,
        }
    }
}
