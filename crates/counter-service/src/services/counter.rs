//! Counter service
//!
//! The `start`, `stop` and `leaderboard` commands.

use counter_core::{CounterState, Permissions, Snowflake, LEADERBOARD_SIZE};
use tracing::{debug, info, instrument, warn};

use crate::commands::{ChannelArg, Command, CommandContext};
use crate::dto::{render_leaderboard, Reply};
use crate::platform::{PlatformError, PlatformResult};

use super::context::BotContext;
use super::error::ServiceResult;
use super::permission::PermissionService;

/// Per-user rate limit applied to counting channels, in seconds
pub const SLOWMODE_SECONDS: u32 = 1;

const START_REASON: &str = "Initiating Counter Channel, adding slowmode against spam";
const STOP_REASON: &str = "Removing Counter Channel, removing slowmode";

/// Reply confirming a stopped channel
pub const STOP_CONFIRMATION: &str = "\u{1f44c}";

/// Counter service
pub struct CounterService<'a> {
    ctx: &'a BotContext,
}

impl<'a> CounterService<'a> {
    /// Create a new CounterService
    pub fn new(ctx: &'a BotContext) -> Self {
        Self { ctx }
    }

    /// Run a parsed command
    pub async fn execute(&self, cmd: &CommandContext, command: Command) -> ServiceResult<Option<Reply>> {
        match command {
            Command::Start { slowmode } => self.start(cmd, slowmode).await,
            Command::Stop => self.stop(cmd).await,
            Command::Leaderboard { target } => self.leaderboard(cmd, target).await,
        }
    }

    /// Turn the invoking channel into a counting channel
    ///
    /// Does nothing if the channel is already tracked. The bot is recorded as
    /// the last counter, so anyone may post `1`.
    #[instrument(skip(self, cmd), fields(channel_id = %cmd.channel_id, user_id = %cmd.author_id))]
    pub async fn start(&self, cmd: &CommandContext, slowmode: bool) -> ServiceResult<Option<Reply>> {
        PermissionService::new(self.ctx).require_permission(cmd, Permissions::MANAGE_MESSAGES)?;

        if self.ctx.counter_repo().find(cmd.channel_id).await?.is_some() {
            debug!("Channel already tracked");
            return Ok(None);
        }

        if slowmode {
            best_effort(
                self.ctx
                    .platform()
                    .set_slowmode(cmd.channel_id, SLOWMODE_SECONDS, START_REASON)
                    .await,
                "enable slowmode",
            )?;
        }

        let state = CounterState::new(cmd.channel_id, Some(self.ctx.bot_user_id()));
        if !self.ctx.counter_repo().create(&state).await? {
            debug!("Channel was started concurrently");
            return Ok(None);
        }

        info!(slowmode, "Counting channel started");
        Ok(Some(Reply::Text(state.count.to_string())))
    }

    /// Stop counting in the invoking channel
    ///
    /// Does nothing if the channel is not tracked. Scores are kept.
    #[instrument(skip(self, cmd), fields(channel_id = %cmd.channel_id, user_id = %cmd.author_id))]
    pub async fn stop(&self, cmd: &CommandContext) -> ServiceResult<Option<Reply>> {
        PermissionService::new(self.ctx).require_permission(cmd, Permissions::MANAGE_MESSAGES)?;

        if self.ctx.counter_repo().find(cmd.channel_id).await?.is_none() {
            debug!("Channel not tracked");
            return Ok(None);
        }

        best_effort(
            self.ctx
                .platform()
                .set_slowmode(cmd.channel_id, 0, STOP_REASON)
                .await,
            "disable slowmode",
        )?;

        self.ctx.counter_repo().delete(cmd.channel_id).await?;

        info!("Counting channel stopped");
        Ok(Some(Reply::Text(STOP_CONFIRMATION.to_string())))
    }

    /// Show the scoreboard of `target`, defaulting to the invoking channel
    ///
    /// Only channels of the invoking guild can be shown; any other target
    /// falls back to the invoking channel. Sends nothing for a channel
    /// without scores.
    #[instrument(skip(self, cmd), fields(channel_id = %cmd.channel_id, user_id = %cmd.author_id))]
    pub async fn leaderboard(
        &self,
        cmd: &CommandContext,
        target: Option<ChannelArg>,
    ) -> ServiceResult<Option<Reply>> {
        let target = self.resolve_target(cmd, target);

        let entries = self
            .ctx
            .leaderboard_repo()
            .top(target, LEADERBOARD_SIZE as i64)
            .await?;

        if entries.is_empty() {
            debug!(target_id = %target, "No scores recorded");
            return Ok(None);
        }

        let requester = if entries.iter().any(|e| e.user_id == cmd.author_id) {
            None
        } else {
            self.ctx.leaderboard_repo().find(target, cmd.author_id).await?
        };

        let channel_name = self.channel_name(target).await?;

        Ok(Some(Reply::Embed(render_leaderboard(
            &channel_name,
            &entries,
            requester.as_ref(),
        ))))
    }

    /// Channel a leaderboard argument points at, within the invoking guild
    fn resolve_target(&self, cmd: &CommandContext, target: Option<ChannelArg>) -> Snowflake {
        let (Some(guild_id), Some(target)) = (cmd.guild_id, target) else {
            return cmd.channel_id;
        };

        let guilds = self.ctx.guilds();
        let resolved = match &target {
            ChannelArg::Id(id) => Some(*id).filter(|id| guilds.guild_of(*id) == Some(guild_id)),
            ChannelArg::Name(name) => guilds.channel_by_name(guild_id, name),
        };

        resolved.unwrap_or_else(|| {
            debug!(argument = ?target, "Leaderboard target outside the guild");
            cmd.channel_id
        })
    }

    /// Resolve a channel's display name, cache first
    ///
    /// Channels the platform will not describe are shown by their ID.
    async fn channel_name(&self, channel_id: Snowflake) -> ServiceResult<String> {
        if let Some(name) = self.ctx.guilds().channel_name(channel_id) {
            return Ok(name);
        }

        match self.ctx.platform().channel_name(channel_id).await {
            Ok(name) => Ok(name),
            Err(e) if e.is_not_found() || e.is_forbidden() => {
                debug!(channel_id = %channel_id, error = %e, "Channel name unavailable");
                Ok(channel_id.to_string())
            }
            Err(e) => Err(e.into()),
        }
    }
}

/// Absorb a refused or throttled platform side effect that the command can do without
fn best_effort(result: PlatformResult<()>, action: &'static str) -> ServiceResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(e) if e.is_forbidden() => {
            warn!(action, error = %e, "Missing platform permission, continuing");
            Ok(())
        }
        Err(e @ PlatformError::RateLimited { .. }) => {
            warn!(action, error = %e, "Rate limited, continuing");
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
