//! Guild cache
//!
//! Holds what permission checks and scoreboard titles need from each guild:
//! the owner, role permissions, and each channel's name and overwrites. Uses
//! `DashMap` for concurrent access from the gateway reader and the services.

use std::collections::HashMap;
use std::sync::Arc;

use counter_core::{PermissionOverwrite, Permissions, Snowflake};
use dashmap::DashMap;

/// Cached view of one guild
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedGuild {
    pub id: Snowflake,
    pub owner_id: Snowflake,
    /// Role ID -> permissions. The @everyone role shares the guild's ID.
    pub roles: HashMap<Snowflake, Permissions>,
    pub channels: HashMap<Snowflake, CachedChannel>,
}

/// Cached view of one guild channel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CachedChannel {
    pub name: String,
    pub overwrites: Vec<PermissionOverwrite>,
}

impl CachedChannel {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            overwrites: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_overwrites(mut self, overwrites: Vec<PermissionOverwrite>) -> Self {
        self.overwrites = overwrites;
        self
    }
}

impl CachedGuild {
    /// Create an empty guild entry
    #[must_use]
    pub fn new(id: Snowflake, owner_id: Snowflake) -> Self {
        Self {
            id,
            owner_id,
            roles: HashMap::new(),
            channels: HashMap::new(),
        }
    }

    /// Permissions granted to everyone in the guild
    #[must_use]
    pub fn everyone_permissions(&self) -> Permissions {
        self.roles.get(&self.id).copied().unwrap_or_default()
    }
}

/// Concurrent guild cache
#[derive(Debug, Default)]
pub struct GuildCache {
    guilds: DashMap<Snowflake, CachedGuild>,
    /// Channel ID -> owning guild ID
    channel_guilds: DashMap<Snowflake, Snowflake>,
}

impl GuildCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Insert or fully replace a guild
    pub fn upsert_guild(&self, guild: CachedGuild) {
        for channel_id in guild.channels.keys() {
            self.channel_guilds.insert(*channel_id, guild.id);
        }
        if let Some(previous) = self.guilds.insert(guild.id, guild.clone()) {
            for channel_id in previous.channels.keys() {
                if !guild.channels.contains_key(channel_id) {
                    self.channel_guilds.remove(channel_id);
                }
            }
        }
        tracing::debug!(guild_id = %guild.id, "Guild cached");
    }

    /// Update owner and roles of a guild, keeping its channels
    ///
    /// Unknown guilds are inserted without channels.
    pub fn update_guild(&self, id: Snowflake, owner_id: Snowflake, roles: HashMap<Snowflake, Permissions>) {
        let mut entry = self
            .guilds
            .entry(id)
            .or_insert_with(|| CachedGuild::new(id, owner_id));
        entry.owner_id = owner_id;
        entry.roles = roles;
    }

    /// Forget a guild and its channels
    pub fn remove_guild(&self, id: Snowflake) {
        if let Some((_, guild)) = self.guilds.remove(&id) {
            for channel_id in guild.channels.keys() {
                self.channel_guilds.remove(channel_id);
            }
            tracing::debug!(guild_id = %id, "Guild removed from cache");
        }
    }

    pub fn upsert_role(&self, guild_id: Snowflake, role_id: Snowflake, permissions: Permissions) {
        if let Some(mut guild) = self.guilds.get_mut(&guild_id) {
            guild.roles.insert(role_id, permissions);
        }
    }

    pub fn remove_role(&self, guild_id: Snowflake, role_id: Snowflake) {
        if let Some(mut guild) = self.guilds.get_mut(&guild_id) {
            guild.roles.remove(&role_id);
        }
    }

    pub fn upsert_channel(&self, guild_id: Snowflake, channel_id: Snowflake, channel: CachedChannel) {
        if let Some(mut guild) = self.guilds.get_mut(&guild_id) {
            guild.channels.insert(channel_id, channel);
            self.channel_guilds.insert(channel_id, guild_id);
        }
    }

    pub fn remove_channel(&self, channel_id: Snowflake) {
        if let Some((_, guild_id)) = self.channel_guilds.remove(&channel_id) {
            if let Some(mut guild) = self.guilds.get_mut(&guild_id) {
                guild.channels.remove(&channel_id);
            }
        }
    }

    /// Snapshot of a cached guild
    #[must_use]
    pub fn get(&self, id: Snowflake) -> Option<CachedGuild> {
        self.guilds.get(&id).map(|g| g.clone())
    }

    /// Guild a cached channel belongs to
    #[must_use]
    pub fn guild_of(&self, channel_id: Snowflake) -> Option<Snowflake> {
        self.channel_guilds.get(&channel_id).map(|g| *g)
    }

    /// Cached name of a channel
    #[must_use]
    pub fn channel_name(&self, channel_id: Snowflake) -> Option<String> {
        let guild_id = self.guild_of(channel_id)?;
        self.guilds
            .get(&guild_id)
            .and_then(|g| g.channels.get(&channel_id).map(|c| c.name.clone()))
    }

    /// Find a channel of a guild by its exact name
    ///
    /// The lowest ID wins when several channels share the name.
    #[must_use]
    pub fn channel_by_name(&self, guild_id: Snowflake, name: &str) -> Option<Snowflake> {
        let guild = self.guilds.get(&guild_id)?;
        let found = guild
            .channels
            .iter()
            .filter(|(_, channel)| channel.name == name)
            .map(|(id, _)| *id)
            .min();
        found
    }
}
