//! In-memory fakes for bot tests
//!
//! Compiled for this crate's tests and, through the `test-support` feature,
//! for the tests of crates built on top of it.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use counter_core::traits::{CounterRepository, LeaderboardRepository, RepoResult};
use counter_core::{Advance, CounterState, DomainError, LeaderboardEntry, Permissions, Snowflake};
use parking_lot::Mutex;

use crate::cache::{CachedChannel, CachedGuild};
use crate::dto::Embed;
use crate::platform::{ChatPlatform, PlatformError, PlatformResult};

use super::context::{BotContext, BotContextBuilder};

pub const BOT_ID: Snowflake = Snowflake::new(1);
pub const GUILD_ID: Snowflake = Snowflake::new(50);
pub const OWNER_ID: Snowflake = Snowflake::new(2);
pub const COUNTING_CHANNEL: Snowflake = Snowflake::new(100);

// ============================================================================
// Store
// ============================================================================

/// Counter and leaderboard tables in memory
#[derive(Default)]
pub struct MemoryStore {
    counters: Mutex<HashMap<Snowflake, CounterState>>,
    scores: Mutex<HashMap<(Snowflake, Snowflake), i64>>,
    failure: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn counter(&self, channel_id: Snowflake) -> Option<CounterState> {
        self.counters.lock().get(&channel_id).cloned()
    }

    pub fn score(&self, channel_id: Snowflake, user_id: Snowflake) -> Option<i64> {
        self.scores.lock().get(&(channel_id, user_id)).copied()
    }

    pub fn seed_counter(&self, state: CounterState) {
        self.counters.lock().insert(state.channel_id, state);
    }

    pub fn seed_score(&self, channel_id: Snowflake, user_id: Snowflake, score: i64) {
        *self.scores.lock().entry((channel_id, user_id)).or_default() += score;
    }

    /// Make every following call fail like an unreachable database
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock() = Some(message.to_string());
    }

    fn check(&self) -> RepoResult<()> {
        match self.failure.lock().as_ref() {
            Some(message) => Err(DomainError::DatabaseError(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CounterRepository for MemoryStore {
    async fn find(&self, channel_id: Snowflake) -> RepoResult<Option<CounterState>> {
        self.check()?;
        Ok(self.counter(channel_id))
    }

    async fn list_channels(&self) -> RepoResult<Vec<Snowflake>> {
        self.check()?;
        let mut channels: Vec<_> = self.counters.lock().keys().copied().collect();
        channels.sort();
        Ok(channels)
    }

    async fn create(&self, state: &CounterState) -> RepoResult<bool> {
        self.check()?;
        let mut counters = self.counters.lock();
        if counters.contains_key(&state.channel_id) {
            return Ok(false);
        }
        counters.insert(state.channel_id, state.clone());
        Ok(true)
    }

    async fn delete(&self, channel_id: Snowflake) -> RepoResult<bool> {
        self.check()?;
        Ok(self.counters.lock().remove(&channel_id).is_some())
    }

    async fn apply_advance(&self, advance: &Advance) -> RepoResult<bool> {
        self.check()?;
        let mut counters = self.counters.lock();
        let Some(state) = counters.get_mut(&advance.channel_id) else {
            return Ok(false);
        };
        if state.count != advance.previous_count {
            return Ok(false);
        }
        state.count = advance.new_count;
        state.last_user_id = Some(advance.author_id);
        *self
            .scores
            .lock()
            .entry((advance.channel_id, advance.author_id))
            .or_default() += 1;
        Ok(true)
    }
}

#[async_trait]
impl LeaderboardRepository for MemoryStore {
    async fn top(&self, channel_id: Snowflake, limit: i64) -> RepoResult<Vec<LeaderboardEntry>> {
        self.check()?;
        let mut entries: Vec<_> = self
            .scores
            .lock()
            .iter()
            .filter(|((channel, _), _)| *channel == channel_id)
            .map(|((channel, user), score)| LeaderboardEntry::new(*channel, *user, *score))
            .collect();
        entries.sort_by(|a, b| b.score.cmp(&a.score).then(a.user_id.cmp(&b.user_id)));
        entries.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(entries)
    }

    async fn find(
        &self,
        channel_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<LeaderboardEntry>> {
        self.check()?;
        Ok(self
            .score(channel_id, user_id)
            .map(|score| LeaderboardEntry::new(channel_id, user_id, score)))
    }
}

// ============================================================================
// Platform
// ============================================================================

/// A side effect observed on the fake platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlatformCall {
    Send { channel_id: Snowflake, content: String },
    Embed { channel_id: Snowflake, embed: Embed },
    Delete { channel_id: Snowflake, message_id: Snowflake },
    Slowmode { channel_id: Snowflake, seconds: u32 },
}

/// Platform fake recording every successful call
#[derive(Default)]
pub struct RecordingPlatform {
    calls: Mutex<Vec<PlatformCall>>,
    channel_names: Mutex<HashMap<Snowflake, String>>,
    forbid_channel_edits: Mutex<bool>,
    throttle_channel_edits: Mutex<Option<Duration>>,
    forbid_deletes: Mutex<bool>,
}

impl RecordingPlatform {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> Vec<PlatformCall> {
        self.calls.lock().clone()
    }

    pub fn name_channel(&self, channel_id: Snowflake, name: &str) {
        self.channel_names.lock().insert(channel_id, name.to_string());
    }

    pub fn forbid_channel_edits(&self) {
        *self.forbid_channel_edits.lock() = true;
    }

    /// Answer channel edits with a rate limit lasting `retry_after`
    pub fn throttle_channel_edits(&self, retry_after: Duration) {
        *self.throttle_channel_edits.lock() = Some(retry_after);
    }

    pub fn forbid_deletes(&self) {
        *self.forbid_deletes.lock() = true;
    }

    fn record(&self, call: PlatformCall) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl ChatPlatform for RecordingPlatform {
    async fn send_message(&self, channel_id: Snowflake, content: &str) -> PlatformResult<()> {
        self.record(PlatformCall::Send {
            channel_id,
            content: content.to_string(),
        });
        Ok(())
    }

    async fn send_embed(&self, channel_id: Snowflake, embed: &Embed) -> PlatformResult<()> {
        self.record(PlatformCall::Embed {
            channel_id,
            embed: embed.clone(),
        });
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: Snowflake,
        message_id: Snowflake,
    ) -> PlatformResult<()> {
        if *self.forbid_deletes.lock() {
            return Err(PlatformError::Forbidden("delete message".to_string()));
        }
        self.record(PlatformCall::Delete {
            channel_id,
            message_id,
        });
        Ok(())
    }

    async fn set_slowmode(
        &self,
        channel_id: Snowflake,
        seconds: u32,
        _reason: &str,
    ) -> PlatformResult<()> {
        if *self.forbid_channel_edits.lock() {
            return Err(PlatformError::Forbidden("edit channel".to_string()));
        }
        if let Some(retry_after) = *self.throttle_channel_edits.lock() {
            return Err(PlatformError::RateLimited { retry_after });
        }
        self.record(PlatformCall::Slowmode {
            channel_id,
            seconds,
        });
        Ok(())
    }

    async fn channel_name(&self, channel_id: Snowflake) -> PlatformResult<String> {
        self.channel_names
            .lock()
            .get(&channel_id)
            .cloned()
            .ok_or_else(|| PlatformError::NotFound(format!("channel {channel_id}")))
    }
}

// ============================================================================
// Assembled bot
// ============================================================================

pub struct TestBot {
    pub ctx: BotContext,
    pub store: Arc<MemoryStore>,
    pub platform: Arc<RecordingPlatform>,
}

impl Default for TestBot {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBot {
    /// Bot with an empty guild cache
    pub fn new() -> Self {
        let store = MemoryStore::new_shared();
        let platform = RecordingPlatform::new_shared();
        let ctx = BotContextBuilder::new()
            .counter_repo(store.clone())
            .leaderboard_repo(store.clone())
            .platform(platform.clone())
            .prefix("!")
            .bot_user_id(BOT_ID)
            .build()
            .unwrap();

        Self {
            ctx,
            store,
            platform,
        }
    }

    /// Bot that knows one guild owned by `OWNER_ID` with a `counting` channel
    ///
    /// @everyone may view and send, nothing more.
    pub fn with_guild() -> Self {
        let bot = Self::new();
        let mut guild = CachedGuild::new(GUILD_ID, OWNER_ID);
        guild
            .roles
            .insert(GUILD_ID, Permissions::VIEW_CHANNEL | Permissions::SEND_MESSAGES);
        guild
            .channels
            .insert(COUNTING_CHANNEL, CachedChannel::new("counting"));
        bot.ctx.guilds().upsert_guild(guild);
        bot
    }
}
