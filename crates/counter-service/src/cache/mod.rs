//! In-memory caches fed by gateway events

mod guilds;

pub use guilds::{CachedChannel, CachedGuild, GuildCache};
