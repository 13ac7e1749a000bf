//! Event payload definitions
//!
//! Only the fields the bot reads are declared; serde skips the rest of each
//! platform object.

use std::collections::HashMap;

use counter_core::{Permissions, PermissionOverwrite, Snowflake};
use counter_service::{CachedChannel, CachedGuild, IncomingMessage};
use serde::Deserialize;

// === Connection Events ===

/// READY event payload
///
/// Sent after successful Identify.
#[derive(Debug, Clone, Deserialize)]
pub struct ReadyEvent {
    /// The bot's own user
    pub user: UserPayload,

    /// Session ID for resuming
    pub session_id: String,

    /// Gateway URL for resuming
    #[serde(default)]
    pub resume_gateway_url: Option<String>,
}

// === User Payload ===

/// User data included in events
#[derive(Debug, Clone, Deserialize)]
pub struct UserPayload {
    pub id: Snowflake,
    #[serde(default)]
    pub bot: bool,
}

// === Guild Events ===

/// GUILD_CREATE event payload
///
/// Sent for each guild after READY, or when the bot joins a guild. During an
/// outage only `id` and `unavailable` are present.
#[derive(Debug, Clone, Deserialize)]
pub struct GuildCreateEvent {
    pub id: Snowflake,
    #[serde(default)]
    pub unavailable: bool,
    #[serde(default)]
    pub owner_id: Option<Snowflake>,
    #[serde(default)]
    pub roles: Vec<RolePayload>,
    #[serde(default)]
    pub channels: Vec<ChannelPayload>,
}

impl GuildCreateEvent {
    /// Cache entry for this guild, if it is available
    #[must_use]
    pub fn into_cached(self) -> Option<CachedGuild> {
        if self.unavailable {
            return None;
        }
        let owner_id = self.owner_id?;

        let mut guild = CachedGuild::new(self.id, owner_id);
        guild.roles = role_map(&self.roles);
        guild.channels = self
            .channels
            .into_iter()
            .filter_map(ChannelPayload::into_cached)
            .collect();
        Some(guild)
    }
}

/// GUILD_UPDATE event payload
#[derive(Debug, Clone, Deserialize)]
pub struct GuildUpdateEvent {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    #[serde(default)]
    pub roles: Vec<RolePayload>,
}

/// GUILD_DELETE event payload
#[derive(Debug, Clone, Deserialize)]
pub struct GuildDeleteEvent {
    pub id: Snowflake,
    /// If true, this is a temporary outage; if false, the bot left or was removed
    #[serde(default)]
    pub unavailable: bool,
}

// === Role Events ===

/// Role data included in guild and role events
#[derive(Debug, Clone, Deserialize)]
pub struct RolePayload {
    pub id: Snowflake,
    pub permissions: Permissions,
}

/// GUILD_ROLE_CREATE / GUILD_ROLE_UPDATE event payload
#[derive(Debug, Clone, Deserialize)]
pub struct GuildRoleEvent {
    pub guild_id: Snowflake,
    pub role: RolePayload,
}

/// GUILD_ROLE_DELETE event payload
#[derive(Debug, Clone, Deserialize)]
pub struct GuildRoleDeleteEvent {
    pub guild_id: Snowflake,
    pub role_id: Snowflake,
}

/// Role ID -> permissions
#[must_use]
pub fn role_map(roles: &[RolePayload]) -> HashMap<Snowflake, Permissions> {
    roles.iter().map(|role| (role.id, role.permissions)).collect()
}

// === Channel Events ===

/// Channel data included in guild and channel events
///
/// Used for CHANNEL_CREATE, CHANNEL_UPDATE and CHANNEL_DELETE.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelPayload {
    pub id: Snowflake,
    /// Absent inside GUILD_CREATE, where the guild is implied
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    /// Absent for direct messages
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub permission_overwrites: Vec<OverwritePayload>,
}

impl ChannelPayload {
    /// Cache entry for a named guild channel
    #[must_use]
    pub fn into_cached(self) -> Option<(Snowflake, CachedChannel)> {
        let name = self.name?;
        let overwrites = self
            .permission_overwrites
            .into_iter()
            .map(PermissionOverwrite::from)
            .collect();
        Some((self.id, CachedChannel::new(name).with_overwrites(overwrites)))
    }
}

/// Permission overwrite attached to a channel
#[derive(Debug, Clone, Deserialize)]
pub struct OverwritePayload {
    /// Role or user ID
    pub id: Snowflake,
    /// 0 for a role, 1 for a member
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(default)]
    pub allow: Permissions,
    #[serde(default)]
    pub deny: Permissions,
}

impl From<OverwritePayload> for PermissionOverwrite {
    fn from(payload: OverwritePayload) -> Self {
        match payload.kind {
            1 => Self::member(payload.id, payload.allow, payload.deny),
            _ => Self::role(payload.id, payload.allow, payload.deny),
        }
    }
}

// === Message Events ===

/// MESSAGE_CREATE event payload
#[derive(Debug, Clone, Deserialize)]
pub struct MessageCreateEvent {
    pub id: Snowflake,
    pub channel_id: Snowflake,
    #[serde(default)]
    pub guild_id: Option<Snowflake>,
    pub author: UserPayload,
    /// Partial member of the author, guild messages only
    #[serde(default)]
    pub member: Option<MemberPayload>,
    /// Empty without the MESSAGE_CONTENT intent
    #[serde(default)]
    pub content: String,
}

/// Guild member data included in events
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPayload {
    #[serde(default)]
    pub roles: Vec<Snowflake>,
}

impl From<MessageCreateEvent> for IncomingMessage {
    fn from(event: MessageCreateEvent) -> Self {
        Self {
            id: event.id,
            channel_id: event.channel_id,
            guild_id: event.guild_id,
            author_id: event.author.id,
            author_is_bot: event.author.bot,
            member_role_ids: event.member.unwrap_or_default().roles,
            content: event.content,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_create_into_incoming() {
        let event: MessageCreateEvent = serde_json::from_value(json!({
            "id": "1100",
            "channel_id": "100",
            "guild_id": "50",
            "author": {"id": "11", "username": "someone", "bot": false},
            "member": {"roles": ["60", "61"], "nick": null},
            "content": "6",
            "tts": false,
            "attachments": []
        }))
        .unwrap();

        let msg = IncomingMessage::from(event);
        assert_eq!(msg.id, Snowflake::new(1100));
        assert_eq!(msg.guild_id, Some(Snowflake::new(50)));
        assert_eq!(msg.author_id, Snowflake::new(11));
        assert!(!msg.author_is_bot);
        assert_eq!(msg.member_role_ids, vec![Snowflake::new(60), Snowflake::new(61)]);
        assert_eq!(msg.content, "6");
    }

    #[test]
    fn test_direct_message_has_no_guild() {
        let event: MessageCreateEvent = serde_json::from_value(json!({
            "id": "1",
            "channel_id": "2",
            "author": {"id": "3"},
            "content": "hi"
        }))
        .unwrap();

        let msg = IncomingMessage::from(event);
        assert_eq!(msg.guild_id, None);
        assert!(msg.member_role_ids.is_empty());
    }

    #[test]
    fn test_guild_create_into_cached() {
        let event: GuildCreateEvent = serde_json::from_value(json!({
            "id": "50",
            "name": "Counting Club",
            "owner_id": "2",
            "roles": [
                {"id": "50", "name": "@everyone", "permissions": "3072"},
                {"id": "60", "name": "mods", "permissions": "16"}
            ],
            "channels": [
                {"id": "100", "type": 0, "name": "counting"},
                {"id": "101", "type": 2, "name": "voice"}
            ]
        }))
        .unwrap();

        let guild = event.into_cached().unwrap();
        assert_eq!(guild.owner_id, Snowflake::new(2));
        assert_eq!(
            guild.everyone_permissions(),
            Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES
        );
        assert_eq!(guild.roles[&Snowflake::new(60)], Permissions::MANAGE_CHANNELS);
        assert_eq!(guild.channels[&Snowflake::new(100)].name, "counting");
        assert!(guild.channels[&Snowflake::new(100)].overwrites.is_empty());
        assert_eq!(guild.channels.len(), 2);
    }

    #[test]
    fn test_channel_overwrites_parsed() {
        let channel: ChannelPayload = serde_json::from_value(json!({
            "id": "100",
            "guild_id": "50",
            "name": "counting",
            "permission_overwrites": [
                {"id": "50", "type": 0, "allow": "0", "deny": "2048"},
                {"id": "60", "type": 0, "allow": "8192", "deny": "0"},
                {"id": "11", "type": 1, "allow": "0", "deny": "8192"}
            ]
        }))
        .unwrap();

        let (id, cached) = channel.into_cached().unwrap();
        assert_eq!(id, Snowflake::new(100));
        assert_eq!(cached.name, "counting");
        assert_eq!(
            cached.overwrites,
            vec![
                PermissionOverwrite::role(
                    Snowflake::new(50),
                    Permissions::empty(),
                    Permissions::SEND_MESSAGES
                ),
                PermissionOverwrite::role(
                    Snowflake::new(60),
                    Permissions::MANAGE_MESSAGES,
                    Permissions::empty()
                ),
                PermissionOverwrite::member(
                    Snowflake::new(11),
                    Permissions::empty(),
                    Permissions::MANAGE_MESSAGES
                ),
            ]
        );
    }

    #[test]
    fn test_unnamed_channel_not_cached() {
        let channel: ChannelPayload =
            serde_json::from_value(json!({"id": "7", "type": 1})).unwrap();
        assert!(channel.into_cached().is_none());
    }

    #[test]
    fn test_unavailable_guild_not_cached() {
        let event: GuildCreateEvent =
            serde_json::from_value(json!({"id": "50", "unavailable": true})).unwrap();
        assert!(event.into_cached().is_none());
    }
}
