//! Dispatch event handler
//!
//! Keeps the guild cache in step with the gateway and hands messages to the
//! message service. Events are handled one at a time, in arrival order.

use counter_service::{BotContext, IncomingMessage, MessageService, ServiceResult};
use tracing::{debug, info};

use super::dispatch::DispatchEvent;
use super::payloads::role_map;

/// Applies dispatch events to the bot
pub struct EventHandler<'a> {
    ctx: &'a BotContext,
}

impl<'a> EventHandler<'a> {
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Handle one dispatch event
    ///
    /// Errors are fatal for the bot.
    pub async fn handle(&self, event: DispatchEvent) -> ServiceResult<()> {
        let guilds = self.ctx.guilds();

        match event {
            DispatchEvent::Ready(ready) => {
                self.ctx.set_bot_user_id(ready.user.id);
                info!(bot_user_id = %ready.user.id, "Gateway session ready");
            }
            DispatchEvent::Resumed => {
                info!("Gateway session resumed");
            }
            DispatchEvent::GuildCreate(event) => {
                let guild_id = event.id;
                match event.into_cached() {
                    Some(guild) => {
                        debug!(
                            guild_id = %guild_id,
                            roles = guild.roles.len(),
                            channels = guild.channels.len(),
                            "Guild available"
                        );
                        guilds.upsert_guild(guild);
                    }
                    None => debug!(guild_id = %guild_id, "Guild unavailable"),
                }
            }
            DispatchEvent::GuildUpdate(event) => {
                guilds.update_guild(event.id, event.owner_id, role_map(&event.roles));
            }
            DispatchEvent::GuildDelete(event) => {
                if event.unavailable {
                    debug!(guild_id = %event.id, "Guild went unavailable");
                } else {
                    info!(guild_id = %event.id, "Removed from guild");
                }
                guilds.remove_guild(event.id);
            }
            DispatchEvent::GuildRoleCreate(event) | DispatchEvent::GuildRoleUpdate(event) => {
                guilds.upsert_role(event.guild_id, event.role.id, event.role.permissions);
            }
            DispatchEvent::GuildRoleDelete(event) => {
                guilds.remove_role(event.guild_id, event.role_id);
            }
            DispatchEvent::ChannelCreate(channel) | DispatchEvent::ChannelUpdate(channel) => {
                if let Some(guild_id) = channel.guild_id {
                    if let Some((channel_id, cached)) = channel.into_cached() {
                        guilds.upsert_channel(guild_id, channel_id, cached);
                    }
                }
            }
            DispatchEvent::ChannelDelete(channel) => {
                guilds.remove_channel(channel.id);
            }
            DispatchEvent::MessageCreate(event) => {
                let msg = IncomingMessage::from(event);
                MessageService::new(self.ctx).handle(&msg).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use counter_core::{CounterState, Permissions, Snowflake};
    use counter_service::services::test_support::{PlatformCall, TestBot};
    use serde_json::json;

    const GUILD: Snowflake = Snowflake::new(50);
    const CHANNEL: Snowflake = Snowflake::new(100);

    async fn dispatch(ctx: &BotContext, name: &str, data: serde_json::Value) {
        let event = DispatchEvent::parse(name, data).unwrap().unwrap();
        EventHandler::new(ctx).handle(event).await.unwrap();
    }

    fn guild_create() -> serde_json::Value {
        json!({
            "id": "50",
            "owner_id": "2",
            "roles": [{"id": "50", "permissions": "3072"}],
            "channels": [{"id": "100", "name": "counting"}]
        })
    }

    #[tokio::test]
    async fn test_ready_sets_bot_identity() {
        let bot = TestBot::new();
        dispatch(
            &bot.ctx,
            "READY",
            json!({"user": {"id": "5", "bot": true}, "session_id": "s"}),
        )
        .await;
        assert_eq!(bot.ctx.bot_user_id(), Snowflake::new(5));
    }

    #[tokio::test]
    async fn test_guild_lifecycle_updates_cache() {
        let bot = TestBot::new();
        let ctx = &bot.ctx;
        dispatch(ctx, "GUILD_CREATE", guild_create()).await;
        assert_eq!(ctx.guilds().channel_name(CHANNEL).as_deref(), Some("counting"));

        dispatch(
            ctx,
            "GUILD_ROLE_CREATE",
            json!({"guild_id": "50", "role": {"id": "60", "permissions": "8"}}),
        )
        .await;
        let guild = ctx.guilds().get(GUILD).unwrap();
        assert_eq!(guild.roles[&Snowflake::new(60)], Permissions::ADMINISTRATOR);

        dispatch(
            ctx,
            "CHANNEL_UPDATE",
            json!({"id": "100", "guild_id": "50", "name": "counting-2"}),
        )
        .await;
        assert_eq!(ctx.guilds().channel_name(CHANNEL).as_deref(), Some("counting-2"));

        dispatch(ctx, "GUILD_ROLE_DELETE", json!({"guild_id": "50", "role_id": "60"})).await;
        assert!(!ctx.guilds().get(GUILD).unwrap().roles.contains_key(&Snowflake::new(60)));

        dispatch(ctx, "CHANNEL_DELETE", json!({"id": "100", "guild_id": "50"})).await;
        assert!(ctx.guilds().channel_name(CHANNEL).is_none());

        dispatch(ctx, "GUILD_DELETE", json!({"id": "50"})).await;
        assert!(ctx.guilds().get(GUILD).is_none());
    }

    #[tokio::test]
    async fn test_guild_update_keeps_channels() {
        let bot = TestBot::new();
        let ctx = &bot.ctx;
        dispatch(ctx, "GUILD_CREATE", guild_create()).await;
        dispatch(
            ctx,
            "GUILD_UPDATE",
            json!({"id": "50", "owner_id": "3", "roles": [{"id": "50", "permissions": "0"}]}),
        )
        .await;

        let guild = ctx.guilds().get(GUILD).unwrap();
        assert_eq!(guild.owner_id, Snowflake::new(3));
        assert_eq!(guild.everyone_permissions(), Permissions::empty());
        assert_eq!(ctx.guilds().channel_name(CHANNEL).as_deref(), Some("counting"));
    }

    #[tokio::test]
    async fn test_channel_overwrite_lets_moderator_start() {
        let bot = TestBot::new();
        let ctx = &bot.ctx;
        dispatch(
            ctx,
            "GUILD_CREATE",
            json!({
                "id": "50",
                "owner_id": "2",
                "roles": [
                    {"id": "50", "permissions": "3072"},
                    {"id": "70", "permissions": "0"}
                ],
                "channels": [{
                    "id": "100",
                    "name": "counting",
                    "permission_overwrites": [
                        {"id": "70", "type": 0, "allow": "8192", "deny": "0"}
                    ]
                }]
            }),
        )
        .await;

        let start = |id: &str, roles: serde_json::Value| {
            json!({
                "id": id,
                "channel_id": "100",
                "guild_id": "50",
                "author": {"id": "12"},
                "member": {"roles": roles},
                "content": "!start"
            })
        };

        // Without the role the command is silently refused
        dispatch(ctx, "MESSAGE_CREATE", start("1000", json!([]))).await;
        assert!(bot.store.counter(CHANNEL).is_none());

        dispatch(ctx, "MESSAGE_CREATE", start("1001", json!(["70"]))).await;
        assert_eq!(bot.store.counter(CHANNEL).unwrap().count, 0);
        assert!(bot.platform.calls().contains(&PlatformCall::Send {
            channel_id: CHANNEL,
            content: "0".to_string(),
        }));
    }

    #[tokio::test]
    async fn test_message_create_plays_the_game() {
        let bot = TestBot::new();
        let ctx = &bot.ctx;
        let mut state = CounterState::new(CHANNEL, Some(Snowflake::new(11)));
        state.count = 5;
        bot.store.seed_counter(state);

        dispatch(
            ctx,
            "MESSAGE_CREATE",
            json!({
                "id": "1000",
                "channel_id": "100",
                "guild_id": "50",
                "author": {"id": "12"},
                "member": {"roles": []},
                "content": "6"
            }),
        )
        .await;
        assert_eq!(bot.store.counter(CHANNEL).unwrap().count, 6);

        dispatch(
            ctx,
            "MESSAGE_CREATE",
            json!({
                "id": "1001",
                "channel_id": "100",
                "guild_id": "50",
                "author": {"id": "12"},
                "content": "7"
            }),
        )
        .await;
        assert_eq!(bot.store.counter(CHANNEL).unwrap().count, 6);
        assert_eq!(
            bot.platform.calls(),
            vec![PlatformCall::Delete {
                channel_id: CHANNEL,
                message_id: Snowflake::new(1001),
            }]
        );
    }
}
