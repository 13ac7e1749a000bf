//! Message service
//!
//! Entry point for every message the gateway delivers: runs commands, then
//! applies the counting game to the message.

use counter_core::{decide, Decision, Snowflake};
use tracing::{debug, info, instrument, warn};

use crate::commands::{parse_command, ParseOutcome};
use crate::dto::{IncomingMessage, Reply};

use super::context::BotContext;
use super::counter::CounterService;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a BotContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Handle one inbound message
    ///
    /// Errors returned from here are fatal; everything the bot is expected to
    /// run into is absorbed and logged.
    #[instrument(skip(self, msg), fields(message_id = %msg.id, channel_id = %msg.channel_id, author_id = %msg.author_id))]
    pub async fn handle(&self, msg: &IncomingMessage) -> ServiceResult<()> {
        if msg.author_is_bot {
            return Ok(());
        }

        let is_command = self.dispatch_command(msg).await?;
        self.play(msg, is_command).await
    }

    /// Run the command in `msg`, if any
    ///
    /// Returns whether the message invoked a registered command.
    async fn dispatch_command(&self, msg: &IncomingMessage) -> ServiceResult<bool> {
        let outcome = parse_command(self.ctx.prefix(), &msg.content);
        let is_command = outcome.is_registered();

        let result = match outcome {
            ParseOutcome::NotCommand => return Ok(false),
            ParseOutcome::Unknown(name) => {
                debug!(command = %name, "Unknown command");
                return Ok(false);
            }
            ParseOutcome::Invalid { command, reason } => {
                Err(ServiceError::usage(format!("{command}: {reason}")))
            }
            ParseOutcome::Command(command) => {
                debug!(command = command.name(), "Running command");
                let cmd = msg.command_context();
                match CounterService::new(self.ctx).execute(&cmd, command).await {
                    Ok(Some(reply)) => self.send_reply(msg.channel_id, &reply).await,
                    Ok(None) => Ok(()),
                    Err(e) => Err(e),
                }
            }
        };

        absorb(result, "Command failed")?;
        Ok(is_command)
    }

    /// Apply the counting game to `msg`
    async fn play(&self, msg: &IncomingMessage, is_command: bool) -> ServiceResult<()> {
        // Commands never count, so skip the lookup
        let state = if is_command {
            None
        } else {
            self.ctx.counter_repo().find(msg.channel_id).await?
        };

        let decision = decide(&msg.count_attempt(is_command), state.as_ref());
        debug!(decision = decision.label(), "Counting decision");

        match decision {
            Decision::Ignore(_) => Ok(()),
            Decision::AcceptAdvance(advance) => {
                if self.ctx.counter_repo().apply_advance(&advance).await? {
                    info!(count = advance.new_count, "Count advanced");
                } else {
                    warn!(
                        expected_previous = advance.previous_count,
                        "Counter changed before the advance was stored, message left alone"
                    );
                }
                Ok(())
            }
            rejected => {
                debug_assert!(rejected.should_delete());
                let result = self
                    .ctx
                    .platform()
                    .delete_message(msg.channel_id, msg.id)
                    .await
                    .map_err(ServiceError::from);
                absorb(result, "Could not delete rejected message")
            }
        }
    }

    async fn send_reply(&self, channel_id: Snowflake, reply: &Reply) -> ServiceResult<()> {
        let platform = self.ctx.platform();
        match reply {
            Reply::Text(content) => platform.send_message(channel_id, content).await?,
            Reply::Embed(embed) => platform.send_embed(channel_id, embed).await?,
        }
        Ok(())
    }
}

/// Drop expected failures after logging them, pass everything else on
fn absorb(result: ServiceResult<()>, context: &'static str) -> ServiceResult<()> {
    match result {
        Err(e) if e.is_swallowed() => {
            debug!(error = %e, code = e.error_code(), "{context}");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::{PlatformCall, TestBot, BOT_ID, GUILD_ID, OWNER_ID};
    use counter_core::CounterState;

    const CHANNEL: Snowflake = Snowflake::new(100);
    const U1: Snowflake = Snowflake::new(11);
    const U2: Snowflake = Snowflake::new(12);

    fn message(id: i64, author: Snowflake, content: &str) -> IncomingMessage {
        IncomingMessage {
            id: Snowflake::new(id),
            channel_id: CHANNEL,
            guild_id: Some(GUILD_ID),
            author_id: author,
            author_is_bot: false,
            member_role_ids: vec![],
            content: content.to_string(),
        }
    }

    /// Tracked channel at count 5, last counted by U1
    fn bot_at_five() -> TestBot {
        let bot = TestBot::with_guild();
        let mut state = CounterState::new(CHANNEL, Some(U1));
        state.count = 5;
        bot.store.seed_counter(state);
        bot
    }

    async fn handle(bot: &TestBot, msg: &IncomingMessage) {
        MessageService::new(&bot.ctx).handle(msg).await.unwrap();
    }

    #[tokio::test]
    async fn test_start_then_reply_zero() {
        let bot = TestBot::with_guild();
        handle(&bot, &message(1, OWNER_ID, "!start")).await;

        let state = bot.store.counter(CHANNEL).unwrap();
        assert_eq!((state.count, state.last_user_id), (0, Some(BOT_ID)));
        assert_eq!(
            bot.platform.calls(),
            vec![
                PlatformCall::Slowmode { channel_id: CHANNEL, seconds: 1 },
                PlatformCall::Send { channel_id: CHANNEL, content: "0".to_string() },
            ]
        );
    }

    #[tokio::test]
    async fn test_correct_number_advances() {
        let bot = bot_at_five();
        handle(&bot, &message(2, U2, "6")).await;

        let state = bot.store.counter(CHANNEL).unwrap();
        assert_eq!((state.count, state.last_user_id), (6, Some(U2)));
        assert_eq!(bot.store.score(CHANNEL, U2), Some(1));
        assert!(bot.platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_same_author_deleted() {
        let bot = bot_at_five();
        handle(&bot, &message(3, U1, "6")).await;

        assert_eq!(bot.store.counter(CHANNEL).unwrap().count, 5);
        assert_eq!(bot.store.score(CHANNEL, U1), None);
        assert_eq!(
            bot.platform.calls(),
            vec![PlatformCall::Delete { channel_id: CHANNEL, message_id: Snowflake::new(3) }]
        );
    }

    #[tokio::test]
    async fn test_wrong_number_deleted() {
        let bot = bot_at_five();
        handle(&bot, &message(4, U2, "7")).await;

        let state = bot.store.counter(CHANNEL).unwrap();
        assert_eq!((state.count, state.last_user_id), (5, Some(U1)));
        assert_eq!(
            bot.platform.calls(),
            vec![PlatformCall::Delete { channel_id: CHANNEL, message_id: Snowflake::new(4) }]
        );
    }

    #[tokio::test]
    async fn test_text_deleted() {
        let bot = bot_at_five();
        handle(&bot, &message(5, U2, "six")).await;

        assert_eq!(bot.store.counter(CHANNEL).unwrap().count, 5);
        assert_eq!(
            bot.platform.calls(),
            vec![PlatformCall::Delete { channel_id: CHANNEL, message_id: Snowflake::new(5) }]
        );
    }

    #[tokio::test]
    async fn test_untracked_channel_ignored() {
        let bot = TestBot::with_guild();
        handle(&bot, &message(6, U2, "hello")).await;
        handle(&bot, &message(7, U2, "1")).await;

        assert!(bot.platform.calls().is_empty());
        assert!(bot.store.counter(CHANNEL).is_none());
    }

    #[tokio::test]
    async fn test_bot_messages_ignored() {
        let bot = bot_at_five();
        let mut msg = message(8, U2, "not a number");
        msg.author_is_bot = true;
        handle(&bot, &msg).await;

        assert!(bot.platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_registered_command_not_deleted() {
        let bot = bot_at_five();
        bot.store.seed_score(CHANNEL, U1, 5);
        handle(&bot, &message(9, U2, "!lb")).await;

        let calls = bot.platform.calls();
        assert_eq!(calls.len(), 1);
        assert!(matches!(&calls[0], PlatformCall::Embed { channel_id, .. } if *channel_id == CHANNEL));
    }

    #[tokio::test]
    async fn test_unknown_command_treated_as_text() {
        let bot = bot_at_five();
        handle(&bot, &message(10, U2, "!help")).await;

        assert_eq!(
            bot.platform.calls(),
            vec![PlatformCall::Delete { channel_id: CHANNEL, message_id: Snowflake::new(10) }]
        );
    }

    #[tokio::test]
    async fn test_permission_denied_is_silent() {
        let bot = bot_at_five();
        handle(&bot, &message(11, U2, "!stop")).await;

        assert!(bot.store.counter(CHANNEL).is_some());
        assert!(bot.platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bad_argument_is_silent() {
        let bot = TestBot::with_guild();
        handle(&bot, &message(12, OWNER_ID, "!start perhaps")).await;

        assert!(bot.store.counter(CHANNEL).is_none());
        assert!(bot.platform.calls().is_empty());
    }

    #[tokio::test]
    async fn test_forbidden_delete_is_absorbed() {
        let bot = bot_at_five();
        bot.platform.forbid_deletes();
        handle(&bot, &message(13, U2, "9")).await;

        assert_eq!(bot.store.counter(CHANNEL).unwrap().count, 5);
    }

    #[tokio::test]
    async fn test_store_failure_is_fatal() {
        let bot = bot_at_five();
        bot.store.fail_with("connection refused");

        let err = MessageService::new(&bot.ctx)
            .handle(&message(14, U2, "6"))
            .await
            .unwrap_err();
        assert!(!err.is_swallowed());
        assert_eq!(err.error_code(), "DATABASE_ERROR");
    }

    #[tokio::test]
    async fn test_full_round() {
        let bot = TestBot::with_guild();
        handle(&bot, &message(20, OWNER_ID, "!start false")).await;
        handle(&bot, &message(21, BOT_ID, "1")).await;
        handle(&bot, &message(22, U1, "1")).await;
        handle(&bot, &message(23, U1, "2")).await;
        handle(&bot, &message(24, U2, "2")).await;
        handle(&bot, &message(25, U1, "03")).await;

        let state = bot.store.counter(CHANNEL).unwrap();
        assert_eq!((state.count, state.last_user_id), (3, Some(U1)));
        assert_eq!(bot.store.score(CHANNEL, U1), Some(2));
        assert_eq!(bot.store.score(CHANNEL, U2), Some(1));

        assert_eq!(
            bot.platform.calls(),
            vec![
                PlatformCall::Send { channel_id: CHANNEL, content: "0".to_string() },
                PlatformCall::Delete { channel_id: CHANNEL, message_id: Snowflake::new(21) },
                PlatformCall::Delete { channel_id: CHANNEL, message_id: Snowflake::new(23) },
            ]
        );
    }
}
