//! Bot context - dependency container for services
//!
//! Holds the repositories, the platform client, the guild cache and the
//! bot's own identity.

use std::sync::Arc;

use counter_core::traits::{CounterRepository, LeaderboardRepository};
use counter_core::Snowflake;
use parking_lot::RwLock;

use crate::cache::GuildCache;
use crate::platform::ChatPlatform;

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Created once at startup and shared behind an `Arc`.
pub struct BotContext {
    // Repositories
    counter_repo: Arc<dyn CounterRepository>,
    leaderboard_repo: Arc<dyn LeaderboardRepository>,

    // Platform
    platform: Arc<dyn ChatPlatform>,
    guilds: Arc<GuildCache>,

    // Settings
    prefix: String,
    /// User ID of the bot account, refreshed on every READY
    bot_user_id: RwLock<Snowflake>,
}

impl BotContext {
    /// Create a new bot context with all dependencies
    pub fn new(
        counter_repo: Arc<dyn CounterRepository>,
        leaderboard_repo: Arc<dyn LeaderboardRepository>,
        platform: Arc<dyn ChatPlatform>,
        guilds: Arc<GuildCache>,
        prefix: String,
        bot_user_id: Snowflake,
    ) -> Self {
        Self {
            counter_repo,
            leaderboard_repo,
            platform,
            guilds,
            prefix,
            bot_user_id: RwLock::new(bot_user_id),
        }
    }

    // === Repositories ===

    /// Get the counter repository
    pub fn counter_repo(&self) -> &dyn CounterRepository {
        self.counter_repo.as_ref()
    }

    /// Get the leaderboard repository
    pub fn leaderboard_repo(&self) -> &dyn LeaderboardRepository {
        self.leaderboard_repo.as_ref()
    }

    // === Platform ===

    /// Get the chat platform client
    pub fn platform(&self) -> &dyn ChatPlatform {
        self.platform.as_ref()
    }

    /// Get the guild cache
    pub fn guilds(&self) -> &GuildCache {
        self.guilds.as_ref()
    }

    // === Settings ===

    /// Command prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The bot's own user ID
    pub fn bot_user_id(&self) -> Snowflake {
        *self.bot_user_id.read()
    }

    /// Record the bot's user ID as reported by the gateway
    pub fn set_bot_user_id(&self, id: Snowflake) {
        *self.bot_user_id.write() = id;
    }
}

impl std::fmt::Debug for BotContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotContext")
            .field("repositories", &"...")
            .field("platform", &"dyn ChatPlatform")
            .field("prefix", &self.prefix)
            .field("bot_user_id", &self.bot_user_id())
            .finish()
    }
}

/// Builder for creating BotContext
#[derive(Default)]
pub struct BotContextBuilder {
    counter_repo: Option<Arc<dyn CounterRepository>>,
    leaderboard_repo: Option<Arc<dyn LeaderboardRepository>>,
    platform: Option<Arc<dyn ChatPlatform>>,
    guilds: Option<Arc<GuildCache>>,
    prefix: Option<String>,
    bot_user_id: Option<Snowflake>,
}

impl BotContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter_repo(mut self, repo: Arc<dyn CounterRepository>) -> Self {
        self.counter_repo = Some(repo);
        self
    }

    pub fn leaderboard_repo(mut self, repo: Arc<dyn LeaderboardRepository>) -> Self {
        self.leaderboard_repo = Some(repo);
        self
    }

    pub fn platform(mut self, platform: Arc<dyn ChatPlatform>) -> Self {
        self.platform = Some(platform);
        self
    }

    pub fn guilds(mut self, guilds: Arc<GuildCache>) -> Self {
        self.guilds = Some(guilds);
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn bot_user_id(mut self, id: Snowflake) -> Self {
        self.bot_user_id = Some(id);
        self
    }

    /// Build the BotContext
    ///
    /// The guild cache defaults to an empty one.
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if any required dependency is missing
    pub fn build(self) -> ServiceResult<BotContext> {
        Ok(BotContext::new(
            self.counter_repo
                .ok_or_else(|| ServiceError::internal("counter_repo is required"))?,
            self.leaderboard_repo
                .ok_or_else(|| ServiceError::internal("leaderboard_repo is required"))?,
            self.platform
                .ok_or_else(|| ServiceError::internal("platform is required"))?,
            self.guilds.unwrap_or_else(GuildCache::new_shared),
            self.prefix
                .ok_or_else(|| ServiceError::internal("prefix is required"))?,
            self.bot_user_id
                .ok_or_else(|| ServiceError::internal("bot_user_id is required"))?,
        ))
    }
}
